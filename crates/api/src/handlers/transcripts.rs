//! Handlers for transcript ingestion and history.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskvox_core::status::ITEM_TYPE_REGULAR;
use taskvox_db::models::transcript::{Transcript, TranscriptListParams};
use taskvox_db::repositories::TranscriptRepo;
use taskvox_pipeline::ingest::{self, AudioUpload, IngestOutcome};

use crate::error::AppResult;
use crate::handlers::read_upload_form;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_AUDIO_FILENAME: &str = "recording.webm";
const DEFAULT_AUDIO_MIME: &str = "audio/webm";

#[derive(Debug, Deserialize)]
pub struct IngestTextRequest {
    pub text: String,
    pub item_type: Option<String>,
}

/// POST /api/v1/transcripts
///
/// Organize typed text into categories and append them to the hierarchy.
pub async fn ingest_text(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<IngestTextRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<IngestOutcome>>)> {
    let item_type = input.item_type.as_deref().unwrap_or(ITEM_TYPE_REGULAR);
    let outcome = ingest::ingest_text(
        &state.pool,
        state.generator.as_ref(),
        &auth.owner_id,
        &input.text,
        item_type,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// POST /api/v1/transcripts/audio
///
/// Multipart: `file` (the recording) and optional `item_type`.
pub async fn ingest_audio(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<IngestOutcome>>)> {
    let mut form = read_upload_form(multipart).await?;
    let file = form.take_file()?;
    let item_type = form.field("item_type").unwrap_or(ITEM_TYPE_REGULAR).to_string();

    let upload = AudioUpload {
        bytes: file.bytes,
        filename: file
            .filename
            .unwrap_or_else(|| DEFAULT_AUDIO_FILENAME.to_string()),
        mime_type: file
            .content_type
            .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string()),
    };

    tracing::debug!(
        owner_id = %auth.owner_id,
        bytes = upload.bytes.len(),
        mime_type = %upload.mime_type,
        "Audio upload received",
    );

    let outcome = ingest::ingest_audio(
        &state.pool,
        state.transcriber.as_ref(),
        state.generator.as_ref(),
        &auth.owner_id,
        upload,
        &item_type,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// GET /api/v1/transcripts?limit=&offset=
///
/// Newest first.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TranscriptListParams>,
) -> AppResult<Json<DataResponse<Vec<Transcript>>>> {
    let transcripts =
        TranscriptRepo::list(&state.pool, &auth.owner_id, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: transcripts }))
}
