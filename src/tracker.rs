// Operations tying the scheduling engine to an injected store.

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use crate::classify::{self, ReviewQueues};
use crate::dates;
use crate::error::Result;
use crate::passage::{Passage, PassageDraft};
use crate::schedule;
use crate::store::{PassageRepository, ReviewSink};

/// Classify every passage an owner has into the four due queues.
pub fn review_queues<R>(repo: &R, owner: &str, now: DateTime<Utc>) -> Result<ReviewQueues>
where
    R: PassageRepository,
{
    let passages = repo.passages_for_owner(owner)?;
    classify::partition(passages, now)
}

/// Create a single passage at `now` with no review history.
pub fn add_passage<R>(
    repo: &mut R,
    owner: &str,
    draft: PassageDraft,
    now: DateTime<Utc>,
) -> Result<Passage>
where
    R: PassageRepository,
{
    draft.validate()?;
    let passage = Passage::new(owner, draft, now);
    repo.insert(passage.clone())?;
    Ok(passage)
}

/// Bulk-import passages as if they had been added one per day, the first
/// draft being the oldest, and backfill the review history each would have
/// accumulated under the standard cadence by `now`.
pub fn import_passages<R>(
    repo: &mut R,
    owner: &str,
    drafts: Vec<PassageDraft>,
    now: DateTime<Utc>,
) -> Result<Vec<Passage>>
where
    R: PassageRepository + ReviewSink,
{
    let total = drafts.len();
    let mut created = Vec::with_capacity(total);

    for (i, draft) in drafts.into_iter().enumerate() {
        draft.validate()?;
        let created_at = dates::sub_days(now, (total - 1 - i) as u64)?;
        let passage = Passage::new(owner, draft, created_at);
        repo.insert(passage.clone())?;

        let backfill = schedule::due_dates(created_at, now)?;
        if !backfill.is_empty() {
            repo.record_reviews(passage.id, &backfill)?;
        }
        debug!(
            "imported {} ({}) with {} backfilled reviews",
            passage.reference,
            passage.id,
            backfill.len()
        );
        created.push(passage);
    }

    Ok(created)
}

/// Append one review event at `now` to an existing passage.
pub fn record_review<R>(repo: &mut R, passage_id: Uuid, now: DateTime<Utc>) -> Result<()>
where
    R: ReviewSink,
{
    repo.record_reviews(passage_id, &[now])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ReviewTier;
    use crate::error::Error;
    use crate::store::CsvStore;
    use chrono::{Duration, TimeZone};

    fn draft(reference: &str) -> PassageDraft {
        PassageDraft {
            prompt: format!("Recite {reference}"),
            reference: reference.to_string(),
            text: "words to keep".to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn import_staggers_creation_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();
        let created = import_passages(
            &mut store,
            "local",
            vec![draft("first"), draft("second"), draft("third")],
            now(),
        )
        .unwrap();

        assert_eq!(created.len(), 3);
        assert_eq!(created[0].created_at, now() - Duration::days(2));
        assert_eq!(created[1].created_at, now() - Duration::days(1));
        assert_eq!(created[2].created_at, now());
    }

    #[test]
    fn import_backfills_elapsed_schedule() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();
        import_passages(
            &mut store,
            "local",
            vec![draft("a"), draft("b"), draft("c")],
            now(),
        )
        .unwrap();

        let loaded = store.passages_for_owner("local").unwrap();
        // Oldest passage has seen days 0..=2 of the cadence, and so on down
        // to the newest with just day 0.
        let counts: Vec<usize> = loaded.iter().map(|p| p.reviews.len()).collect();
        assert_eq!(counts, vec![3, 2, 1]);
        // Every backfilled history ends today.
        for p in &loaded {
            assert_eq!(p.last_review().unwrap().date_naive(), now().date_naive());
        }
    }

    #[test]
    fn freshly_imported_set_is_due_tomorrow_not_today() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();
        import_passages(&mut store, "local", vec![draft("a"), draft("b")], now()).unwrap();

        let today = review_queues(&store, "local", now()).unwrap();
        assert!(today.is_empty());

        let tomorrow = review_queues(&store, "local", now() + Duration::days(1)).unwrap();
        assert_eq!(tomorrow.daily.len(), 2);
        assert_eq!(tomorrow.all.len(), 2);
        assert_eq!(tomorrow.daily[0].passage.reference, "a");
    }

    #[test]
    fn add_passage_starts_with_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();
        let passage = add_passage(&mut store, "local", draft("fresh"), now()).unwrap();
        assert_eq!(passage.created_at, now());

        let queues = review_queues(&store, "local", now()).unwrap();
        assert_eq!(queues.daily.len(), 1);
        assert!(queues.daily[0].reviews.is_empty());
    }

    #[test]
    fn add_passage_rejects_blank_draft() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();
        let blank = PassageDraft {
            prompt: String::new(),
            reference: "r".to_string(),
            text: "t".to_string(),
        };
        assert!(matches!(
            add_passage(&mut store, "local", blank, now()),
            Err(Error::InvalidInput(_))
        ));
        assert!(store.passages_for_owner("local").unwrap().is_empty());
    }

    #[test]
    fn recording_reviews_moves_a_passage_up_the_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();
        let start = now() - Duration::days(30);
        let passage = add_passage(&mut store, "local", draft("psalm"), start).unwrap();

        // One review a day for a week.
        for day in 0..7 {
            record_review(&mut store, passage.id, start + Duration::days(day)).unwrap();
        }

        // Seven reviews, last one more than a week ago: weekly and due.
        let queues = review_queues(&store, "local", now()).unwrap();
        assert_eq!(queues.weekly.len(), 1);
        let c = classify::classify(7, Some(start + Duration::days(6)), now()).unwrap();
        assert_eq!(c.tier, ReviewTier::Weekly);
        assert!(c.due);
    }

    #[test]
    fn record_review_for_unknown_passage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvStore::open(dir.path()).unwrap();
        assert!(matches!(
            record_review(&mut store, Uuid::new_v4(), now()),
            Err(Error::PassageNotFound(_))
        ));
    }
}
