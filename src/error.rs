use thiserror::Error;

/// Error taxonomy of an evaluation run.
///
/// Only `ServiceUnavailable` and `Validation` are fatal to a run; every other variant is
/// caught at a stage boundary and replaced by that stage's fallback value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluationError {
    /// No generation backend is configured.
    #[error("no AI service available: {0}")]
    ServiceUnavailable(String),

    /// Malformed input rejected at construction time.
    #[error("validation error: {0}")]
    Validation(String),

    /// A single prompted call failed.
    #[error("generation failed: {0}")]
    Generation(String),

    /// A single prompted call exceeded its time budget.
    #[error("generation timed out after {0}s")]
    Timeout(u64),

    /// Image bytes could not be loaded or decoded.
    #[error("image processing failed: {0}")]
    Image(String),
}

impl EvaluationError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn generation(message: impl std::fmt::Display) -> Self {
        Self::Generation(message.to_string())
    }

    /// Whether the error must abort the whole evaluation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ServiceUnavailable(_) | Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, EvaluationError>;
