use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Error, Result};

/// A memorized text passage under review.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Passage {
    pub id: Uuid,
    pub owner: String,
    pub prompt: String,
    pub reference: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Passage {
    pub fn new(owner: &str, draft: PassageDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            prompt: draft.prompt,
            reference: draft.reference,
            text: draft.text,
            created_at,
        }
    }
}

/// Content of a passage before it has an identity, as accepted by the
/// create and bulk-import operations.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PassageDraft {
    pub prompt: String,
    pub reference: String,
    pub text: String,
}

impl PassageDraft {
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(Error::InvalidInput("prompt must not be empty".into()));
        }
        if self.reference.trim().is_empty() {
            return Err(Error::InvalidInput("reference must not be empty".into()));
        }
        if self.text.trim().is_empty() {
            return Err(Error::InvalidInput("text must not be empty".into()));
        }
        Ok(())
    }
}

/// One completed review of a passage. Events are append-only; they are only
/// ever removed when the owning passage is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ReviewEvent {
    pub passage_id: Uuid,
    pub reviewed_at: DateTime<Utc>,
}

/// A passage together with its review history, reviews sorted ascending.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PassageWithHistory {
    pub passage: Passage,
    pub reviews: Vec<ReviewEvent>,
}

impl PassageWithHistory {
    pub fn last_review(&self) -> Option<DateTime<Utc>> {
        self.reviews.last().map(|r| r.reviewed_at)
    }
}
