use taskvox_ai::AiError;
use taskvox_core::error::CoreError;
use taskvox_core::normalize::ParseFailure;
use taskvox_core::structure::ValidationError;

/// Errors from the AI-backed flows.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The AI service could not be reached or rejected the call.
    #[error(transparent)]
    Ai(#[from] AiError),

    /// The model's reply could not be parsed as JSON.
    #[error(transparent)]
    Parse(#[from] ParseFailure),

    /// The reply parsed but did not have the expected shape.
    #[error("AI response has an invalid structure: {0}")]
    Validation(#[from] ValidationError),

    /// Missing target, failed precondition, or bad input.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl PipelineError {
    pub(crate) fn not_found(entity: &'static str, id: taskvox_core::types::DbId) -> Self {
        Self::Core(CoreError::NotFound { entity, id })
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(message.into()))
    }
}
