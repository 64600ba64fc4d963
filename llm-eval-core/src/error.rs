use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("Batch length mismatch: {preds} predictions vs {tgts} targets")]
    BatchLengthMismatch { preds: usize, tgts: usize },

    #[error("Cannot evaluate an empty accumulator")]
    EmptyAccumulator,

    #[error("Hypothesis is empty")]
    EmptyHypothesis,

    #[error("Reference is empty")]
    EmptyReference,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid n-gram weights: {0}")]
    InvalidWeights(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, MetricError>;

// Implement From for common error types
impl From<serde_json::Error> for MetricError {
    fn from(err: serde_json::Error) -> Self {
        MetricError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for MetricError {
    fn from(err: config::ConfigError) -> Self {
        MetricError::Config(err.to_string())
    }
}
