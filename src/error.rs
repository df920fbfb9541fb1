use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("date arithmetic out of range")]
    DateOutOfRange,

    #[error("passage not found: {0}")]
    PassageNotFound(Uuid),

    #[error("malformed store record: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("timestamp parse error: {0}")]
    Timestamp(#[from] chrono::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
