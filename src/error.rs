use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidRecord { field: String, reason: String },

    #[error("Duplicate record id: {0}")]
    DuplicateId(String),

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, FinviewError>;
