//! Errors raised while loading the frozen artifacts.
//!
//! Serving never produces these: once a [`crate::recommend::Recommender`] is
//! built, every request degrades instead of failing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("IO error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unsupported artifact: expected format '{expected}' version {supported}, got '{found}' version {version}")]
    UnsupportedFormat {
        expected: &'static str,
        supported: u32,
        found: String,
        version: u32,
    },

    #[error("Dimension mismatch in {what}: expected {expected}, got {found}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        found: usize,
    },

    #[error("Cluster model was fitted against vectorizer {expected}, loaded vectorizer is {found}")]
    FingerprintMismatch { expected: String, found: String },

    #[error("Empty model: {0}")]
    EmptyModel(String),

    #[error("Unknown stemmer '{0}'")]
    UnknownStemmer(String),
}

pub type ArtifactResult<T> = Result<T, ArtifactError>;
