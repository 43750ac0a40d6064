//! Error types for the motormart prediction backend

use thiserror::Error;

/// Result type alias for motormart operations
pub type Result<T> = std::result::Result<T, MotormartError>;

/// Main error type for the prediction backend
#[derive(Error, Debug)]
pub enum MotormartError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid {field}: expected a {expected}, got '{value}'")]
    InvalidNumeric {
        field: String,
        expected: String,
        value: String,
    },

    /// A categorical input could not be resolved against its vocabulary.
    /// Carries a sample of valid values so the caller can self-correct.
    #[error("{field} '{input}' not found")]
    Resolution {
        field: String,
        input: String,
        sample: Vec<String>,
    },

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<polars::error::PolarsError> for MotormartError {
    fn from(err: polars::error::PolarsError) -> Self {
        MotormartError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for MotormartError {
    fn from(err: serde_json::Error) -> Self {
        MotormartError::Serialization(err.to_string())
    }
}
