//! Error taxonomy for menu analysis

use thiserror::Error;

/// Top-level error type for the analysis pipeline
///
/// Scoring and ranking are pure and cannot fail; every variant here
/// originates at an I/O boundary (extraction upstream, persistence store)
/// or at request validation.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("profile not found for user {0}")]
    ProfileNotFound(String),

    #[error("extraction unavailable: {0}")]
    ExtractionUnavailable(String),

    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
