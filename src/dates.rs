// Calendar arithmetic shared by the scheduler and classifier. All instants
// are UTC and every calendar comparison uses the UTC calendar date, so the
// two components can never disagree about what "day" an event fell on.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};

use crate::error::{Error, Result};

pub fn add_days(t: DateTime<Utc>, days: u64) -> Result<DateTime<Utc>> {
    t.checked_add_days(Days::new(days))
        .ok_or(Error::DateOutOfRange)
}

pub fn sub_days(t: DateTime<Utc>, days: u64) -> Result<DateTime<Utc>> {
    t.checked_sub_days(Days::new(days))
        .ok_or(Error::DateOutOfRange)
}

pub fn add_weeks(t: DateTime<Utc>, weeks: u64) -> Result<DateTime<Utc>> {
    add_days(t, weeks * 7)
}

/// Calendar-month addition. The day-of-month is clamped to the last valid
/// day of the target month: Jan 31 + 1 month is Feb 28 (Feb 29 in a leap
/// year), never a rollover into March.
pub fn add_months(t: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>> {
    t.checked_add_months(Months::new(months))
        .ok_or(Error::DateOutOfRange)
}

/// Calendar-month subtraction with the same day-clamping as [`add_months`].
pub fn months_before(d: NaiveDate, months: u32) -> Result<NaiveDate> {
    d.checked_sub_months(Months::new(months))
        .ok_or(Error::DateOutOfRange)
}

pub fn same_calendar_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Whole calendar days from `earlier` to `later`, by date components rather
/// than elapsed time. Two instants 40 minutes apart straddling midnight are
/// one day apart; negative when `later` precedes `earlier`.
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    (later.date_naive() - earlier.date_naive()).num_days()
}
