//! Error types for the mtf-merge pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the mtf-merge pipeline.
///
/// Structural errors (missing inputs, bad schemas, unparseable values) abort
/// a run before any output is written. Data-quality issues (degenerate
/// returns, causality gaps) are recovered locally and only surface here as
/// `NoUsableRows` when they exhaust the dataset.
#[derive(Error, Debug)]
pub enum Error {
    /// An input artifact does not exist or is unreadable.
    #[error("missing source: {}", path.display())]
    MissingSource { path: PathBuf },

    /// A required column is absent from an input artifact.
    #[error("schema error: required column '{0}' not found")]
    Schema(String),

    /// A cell value could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The merged table is empty after alignment and contract filtering.
    #[error("no usable rows after alignment and contract filtering")]
    NoUsableRows,

    /// A predictor returned an out-of-range or otherwise unusable value.
    #[error("prediction error: {0}")]
    Prediction(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a missing-source error.
    pub fn missing_source(path: impl Into<PathBuf>) -> Self {
        Error::MissingSource { path: path.into() }
    }

    /// Create a schema error naming the missing column.
    pub fn schema(column: impl Into<String>) -> Self {
        Error::Schema(column.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }

    /// Create a prediction error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Error::Prediction(msg.into())
    }
}
