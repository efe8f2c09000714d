use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid sample: declared {declared} documents but observed {observed}")]
    InvalidSample { declared: u64, observed: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenience Result type using our Error
pub type Result<T> = std::result::Result<T, Error>;
