use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The two sides share no finite metric to compare.
    #[error("no comparable metrics")]
    NoComparableMetrics,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
