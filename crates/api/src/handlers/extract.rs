//! Handlers for extracting flat to-do lists from images or pasted text,
//! and saving a reviewed list into a category.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskvox_ai::ImageInput;
use taskvox_core::status::ITEM_TYPE_REGULAR;
use taskvox_db::models::category::Category;
use taskvox_db::models::hierarchy::ApplySummary;
use taskvox_pipeline::extract;

use crate::error::{AppError, AppResult};
use crate::handlers::read_upload_form;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveExtractionRequest {
    pub category_name: String,
    pub entries: Vec<String>,
    pub item_type: Option<String>,
}

/// Extracted entries, for the client to review before saving.
#[derive(Debug, Serialize)]
pub struct ExtractResult {
    pub entries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResult {
    pub category: Category,
    pub summary: ApplySummary,
}

/// POST /api/v1/extract/image
///
/// Multipart: `file` (png, jpeg, webp, heic or heif). Nothing is saved.
pub async fn from_image(
    _auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<ExtractResult>>> {
    let file = read_upload_form(multipart).await?.take_file()?;
    let mime_type = file.content_type.ok_or_else(|| {
        AppError::BadRequest("Image part must carry a Content-Type".into())
    })?;

    let entries = extract::extract_from_image(
        state.generator.as_ref(),
        ImageInput {
            bytes: file.bytes,
            mime_type,
        },
    )
    .await?;
    Ok(Json(DataResponse {
        data: ExtractResult { entries },
    }))
}

/// POST /api/v1/extract/text
pub async fn from_text(
    _auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ExtractTextRequest>,
) -> AppResult<Json<DataResponse<ExtractResult>>> {
    let entries = extract::extract_from_text(state.generator.as_ref(), &input.text).await?;
    Ok(Json(DataResponse {
        data: ExtractResult { entries },
    }))
}

/// POST /api/v1/extract/save
///
/// Appends to the category with this name (any case), creating it if needed.
pub async fn save(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SaveExtractionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SaveResult>>)> {
    let item_type = input.item_type.as_deref().unwrap_or(ITEM_TYPE_REGULAR);
    let (category, summary) = extract::save_extraction(
        &state.pool,
        &auth.owner_id,
        &input.category_name,
        &input.entries,
        item_type,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: SaveResult { category, summary },
        }),
    ))
}
