// Flat-file store: passages.csv and reviews.csv under one data directory,
// loaded on open, written back through on every mutation. The engine itself
// only ever sees the two traits.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::passage::{Passage, PassageWithHistory, ReviewEvent};

/// Read side of the store: already-fetched passages with their ordered
/// review histories. The engine never issues queries of its own.
pub trait PassageRepository {
    /// All passages for an owner, oldest first, each with its reviews
    /// sorted ascending.
    fn passages_for_owner(&self, owner: &str) -> Result<Vec<PassageWithHistory>>;

    fn get(&self, id: Uuid) -> Result<Option<Passage>>;

    fn insert(&mut self, passage: Passage) -> Result<()>;

    /// Remove a passage and every review event attached to it.
    fn delete(&mut self, id: Uuid) -> Result<()>;
}

/// Write side for review events, used when recording a live review and when
/// backfilling history during import.
pub trait ReviewSink {
    fn record_reviews(&mut self, passage_id: Uuid, times: &[DateTime<Utc>]) -> Result<()>;
}

const PASSAGES_FILE: &str = "passages.csv";
const REVIEWS_FILE: &str = "reviews.csv";

pub struct CsvStore {
    dir: PathBuf,
    passages: Vec<Passage>,
    reviews: Vec<ReviewEvent>,
}

impl CsvStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let passages = load_passages(&dir.join(PASSAGES_FILE))?;
        let reviews = load_reviews(&dir.join(REVIEWS_FILE))?;
        debug!(
            "opened store at {}: {} passages, {} reviews",
            dir.display(),
            passages.len(),
            reviews.len()
        );
        Ok(Self {
            dir,
            passages,
            reviews,
        })
    }

    fn save(&self) -> Result<()> {
        save_passages(&self.dir.join(PASSAGES_FILE), &self.passages)?;
        save_reviews(&self.dir.join(REVIEWS_FILE), &self.reviews)?;
        Ok(())
    }
}

impl PassageRepository for CsvStore {
    fn passages_for_owner(&self, owner: &str) -> Result<Vec<PassageWithHistory>> {
        let mut passages: Vec<&Passage> =
            self.passages.iter().filter(|p| p.owner == owner).collect();
        passages.sort_by_key(|p| p.created_at);

        Ok(passages
            .into_iter()
            .map(|p| {
                let mut reviews: Vec<ReviewEvent> = self
                    .reviews
                    .iter()
                    .filter(|r| r.passage_id == p.id)
                    .copied()
                    .collect();
                reviews.sort_by_key(|r| r.reviewed_at);
                PassageWithHistory {
                    passage: p.clone(),
                    reviews,
                }
            })
            .collect())
    }

    fn get(&self, id: Uuid) -> Result<Option<Passage>> {
        Ok(self.passages.iter().find(|p| p.id == id).cloned())
    }

    fn insert(&mut self, passage: Passage) -> Result<()> {
        self.passages.push(passage);
        self.save()
    }

    fn delete(&mut self, id: Uuid) -> Result<()> {
        let before = self.passages.len();
        self.passages.retain(|p| p.id != id);
        if self.passages.len() == before {
            return Err(Error::PassageNotFound(id));
        }
        self.reviews.retain(|r| r.passage_id != id);
        self.save()
    }
}

impl ReviewSink for CsvStore {
    fn record_reviews(&mut self, passage_id: Uuid, times: &[DateTime<Utc>]) -> Result<()> {
        if !self.passages.iter().any(|p| p.id == passage_id) {
            return Err(Error::PassageNotFound(passage_id));
        }
        self.reviews.extend(times.iter().map(|&t| ReviewEvent {
            passage_id,
            reviewed_at: t,
        }));
        self.save()
    }
}

fn format_instant(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s.trim())?.with_timezone(&Utc))
}

fn parse_id(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s.trim()).map_err(|e| Error::Corrupt(format!("bad id {s:?}: {e}")))
}

fn field(record: &csv::StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").to_string()
}

fn load_passages(path: &Path) -> Result<Vec<Passage>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut passages = Vec::new();
    for result in reader.records() {
        let record = result?;
        passages.push(Passage {
            id: parse_id(&field(&record, 0))?,
            owner: field(&record, 1),
            prompt: field(&record, 2),
            reference: field(&record, 3),
            text: field(&record, 4),
            created_at: parse_instant(&field(&record, 5))?,
        });
    }
    Ok(passages)
}

fn save_passages(path: &Path, passages: &[Passage]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["id", "owner", "prompt", "reference", "text", "created_at"])?;
    for p in passages {
        writer.write_record([
            p.id.to_string().as_str(),
            p.owner.as_str(),
            p.prompt.as_str(),
            p.reference.as_str(),
            p.text.as_str(),
            format_instant(p.created_at).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn load_reviews(path: &Path) -> Result<Vec<ReviewEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut reviews = Vec::new();
    for result in reader.records() {
        let record = result?;
        reviews.push(ReviewEvent {
            passage_id: parse_id(&field(&record, 0))?,
            reviewed_at: parse_instant(&field(&record, 1))?,
        });
    }
    Ok(reviews)
}

fn save_reviews(path: &Path, reviews: &[ReviewEvent]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["passage_id", "reviewed_at"])?;
    for r in reviews {
        writer.write_record([
            r.passage_id.to_string().as_str(),
            format_instant(r.reviewed_at).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
