// Backfill schedule for imported passages:
// - every day for the first week (days 0 through 6)
// - once a week for the rest of the first month (days 7, 14, 21)
// - once a month for the rest of the first year (months 1 through 11)

use chrono::{DateTime, Utc};

use crate::dates;
use crate::error::{Error, Result};

/// All review dates in the fixed cadence that have elapsed by `now`,
/// inclusive. The output is the raw concatenation of the three phases in
/// generation order; it is not deduplicated against neighbouring phases and
/// not re-sorted. Month steps clamp the day-of-month per
/// [`dates::add_months`].
///
/// This seeds historical review events during bulk import only. Whether a
/// live passage is due comes from the classifier, never from re-deriving
/// this schedule.
pub fn due_dates(created_at: DateTime<Utc>, now: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>> {
    if created_at > now {
        return Err(Error::InvalidInput(format!(
            "created_at {created_at} is after now {now}"
        )));
    }

    let mut out = Vec::new();

    for k in 0..7 {
        let d = dates::add_days(created_at, k)?;
        if d <= now {
            out.push(d);
        }
    }

    for k in 1..=3 {
        let d = dates::add_weeks(created_at, k)?;
        if d <= now {
            out.push(d);
        }
    }

    for k in 1..=11 {
        let d = dates::add_months(created_at, k)?;
        if d <= now {
            out.push(d);
        }
    }

    Ok(out)
}
