use axum::routing::{get, post};
use axum::Router;

use crate::handlers::transcripts;
use crate::state::AppState;

/// Routes mounted at `/transcripts`.
///
/// ```text
/// GET  /        -> list
/// POST /        -> ingest_text
/// POST /audio   -> ingest_audio
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(transcripts::list).post(transcripts::ingest_text))
        .route("/audio", post(transcripts::ingest_audio))
}
