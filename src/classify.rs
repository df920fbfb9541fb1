// Review-frequency classification. A passage's tier falls out of how many
// reviews it has accumulated; whether it is due falls out of how long ago
// the latest review happened, measured in calendar dates.

use chrono::{DateTime, Utc};

use crate::dates;
use crate::error::{Error, Result};
use crate::passage::PassageWithHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum ReviewTier {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ReviewTier {
    pub fn label(self) -> &'static str {
        match self {
            ReviewTier::Daily => "daily",
            ReviewTier::Weekly => "weekly",
            ReviewTier::Monthly => "monthly",
            ReviewTier::Yearly => "yearly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub tier: ReviewTier,
    pub due: bool,
}

/// Classify a passage from its review count and latest review time.
///
/// Count ranges pick the tier: under 7 reviews daily, under 11 weekly,
/// under 23 monthly, 23 and up yearly. The due check is per tier: a daily
/// passage is due unless it was already reviewed on `now`'s calendar date;
/// the other tiers are due once the latest review is more than 7 days, one
/// calendar month, or one calendar year old. All comparisons use UTC
/// calendar dates, so a review late last night still counts as yesterday.
pub fn classify(
    review_count: usize,
    last_review: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<Classification> {
    let last = match (review_count, last_review) {
        (0, None) => {
            return Ok(Classification {
                tier: ReviewTier::Daily,
                due: true,
            });
        }
        (0, Some(_)) => {
            return Err(Error::InvalidInput(
                "zero reviews but a latest review time was given".into(),
            ));
        }
        (_, None) => {
            return Err(Error::InvalidInput(
                "reviews recorded but no latest review time was given".into(),
            ));
        }
        (_, Some(t)) => t,
    };

    let classification = if review_count < 7 {
        Classification {
            tier: ReviewTier::Daily,
            due: !dates::same_calendar_day(last, now),
        }
    } else if review_count < 11 {
        Classification {
            tier: ReviewTier::Weekly,
            due: dates::days_between(last, now) > 7,
        }
    } else if review_count < 23 {
        let cutoff = dates::months_before(now.date_naive(), 1)?;
        Classification {
            tier: ReviewTier::Monthly,
            due: last.date_naive() < cutoff,
        }
    } else {
        let cutoff = dates::months_before(now.date_naive(), 12)?;
        Classification {
            tier: ReviewTier::Yearly,
            due: last.date_naive() < cutoff,
        }
    };
    Ok(classification)
}

/// The four due queues for one owner, plus every due passage concatenated
/// in fixed tier order.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReviewQueues {
    pub daily: Vec<PassageWithHistory>,
    pub weekly: Vec<PassageWithHistory>,
    pub monthly: Vec<PassageWithHistory>,
    pub yearly: Vec<PassageWithHistory>,
    pub all: Vec<PassageWithHistory>,
}

impl ReviewQueues {
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Partition passages into due queues. Each queue keeps the input's
/// relative order; a passage whose tier is not currently due appears in no
/// queue at all.
pub fn partition(passages: Vec<PassageWithHistory>, now: DateTime<Utc>) -> Result<ReviewQueues> {
    let mut daily = Vec::new();
    let mut weekly = Vec::new();
    let mut monthly = Vec::new();
    let mut yearly = Vec::new();

    for passage in passages {
        let c = classify(passage.reviews.len(), passage.last_review(), now)?;
        if !c.due {
            continue;
        }
        match c.tier {
            ReviewTier::Daily => daily.push(passage),
            ReviewTier::Weekly => weekly.push(passage),
            ReviewTier::Monthly => monthly.push(passage),
            ReviewTier::Yearly => yearly.push(passage),
        }
    }

    let mut all = Vec::with_capacity(daily.len() + weekly.len() + monthly.len() + yearly.len());
    all.extend(daily.iter().cloned());
    all.extend(weekly.iter().cloned());
    all.extend(monthly.iter().cloned());
    all.extend(yearly.iter().cloned());

    Ok(ReviewQueues {
        daily,
        weekly,
        monthly,
        yearly,
        all,
    })
}
