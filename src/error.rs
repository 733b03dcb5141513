//! Error handling for the resume curator

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeCuratorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation failed ({} problem(s)):\n{}", .0.len(), .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Invalid page budget: {0} (must be positive)")]
    InvalidBudget(i64),

    #[error("Incomplete profile: {0}")]
    IncompleteProfile(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Text optimization unavailable: {0}")]
    OptimizationUnavailable(String),
}

pub type Result<T> = std::result::Result<T, ResumeCuratorError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumeCuratorError {
    fn from(err: anyhow::Error) -> Self {
        ResumeCuratorError::InvalidInput(err.to_string())
    }
}
