use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskvox_ai::AiError;
use taskvox_core::error::CoreError;
use taskvox_notify::MailError;
use taskvox_pipeline::PipelineError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors, [`PipelineError`] for the AI
/// flows and [`MailError`] for sharing, and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent `{error, code}` bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Mail(#[from] MailError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A dependency the request needs is not configured.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Pipeline(err) => classify_pipeline_error(err),

            AppError::Mail(MailError::Address(err)) => (
                StatusCode::BAD_REQUEST,
                "INVALID_EMAIL",
                format!("Invalid email address: {err}"),
            ),
            AppError::Mail(err) => {
                tracing::error!(error = %err, "Mail delivery failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "MAIL_FAILED",
                    "Could not send the email".to_string(),
                )
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// AI failures are surfaced without the provider's raw reply; the raw text
/// was already logged by the pipeline. An empty reply came from a reachable
/// service, so it is reported as unparseable rather than unavailable.
fn classify_pipeline_error(err: &PipelineError) -> (StatusCode, &'static str, String) {
    match err {
        PipelineError::Ai(AiError::EmptyResponse) | PipelineError::Parse(_) => (
            StatusCode::BAD_GATEWAY,
            "AI_RESPONSE_UNPARSEABLE",
            "Could not understand the AI response".to_string(),
        ),
        PipelineError::Ai(ai) => {
            tracing::warn!(error = %ai, "AI service call failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "AI_UNAVAILABLE",
                "Could not reach the AI service".to_string(),
            )
        }
        PipelineError::Validation(v) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_STRUCTURE",
            format!("Invalid structure: {v}"),
        ),
        PipelineError::Core(core) => classify_core_error(core),
        PipelineError::Database(db) => classify_sqlx_error(db),
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Check constraint violations (blank text, unknown status) map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL check constraint violation: error code 23514
            if db_err.code().as_deref() == Some("23514") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value violates check constraint: {constraint}"),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
