//! Pipeline error types.
//!
//! Only a missing dataset is fatal to a dashboard run. Everything else that
//! can go wrong with the data degrades into empty aggregates instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PulseError {
    #[error("Dataset not found: '{path}'")]
    DatasetNotFound { path: String },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dataset is missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations.
pub type PulseResult<T> = Result<T, PulseError>;
