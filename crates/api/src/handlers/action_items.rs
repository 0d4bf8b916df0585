//! Handlers for individual action items.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskvox_core::error::CoreError;
use taskvox_core::status::validate_item_status;
use taskvox_core::types::DbId;
use taskvox_db::models::action_item::{ActionItem, UpdateActionItem, UpdateActionItemStatus};
use taskvox_db::models::hierarchy::CategoryTree;
use taskvox_db::models::next_step::{CreateNextStep, NextStep};
use taskvox_db::repositories::{ActionItemRepo, NextStepRepo};
use taskvox_pipeline::enhance;

use crate::error::{AppError, AppResult};
use crate::handlers::{require_text, ConvertResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ActionItem",
        id,
    })
}

#[derive(Debug, Deserialize)]
pub struct EnhanceItemRequest {
    pub transcript: String,
}

/// PUT /api/v1/action-items/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateActionItem>,
) -> AppResult<Json<DataResponse<ActionItem>>> {
    if let Some(text) = input.text.as_deref() {
        require_text(text, "text")?;
    }
    let item = ActionItemRepo::update(&state.pool, &auth.owner_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/action-items/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ActionItemRepo::delete(&state.pool, &auth.owner_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// PUT /api/v1/action-items/{id}/status
pub async fn set_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateActionItemStatus>,
) -> AppResult<Json<DataResponse<ActionItem>>> {
    validate_item_status(&input.status)?;
    let item = ActionItemRepo::set_status(&state.pool, &auth.owner_id, id, &input.status)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: item }))
}

/// POST /api/v1/action-items/{id}/convert-to-regular
///
/// Reports `converted: 0` for an item that is already regular.
pub async fn convert_to_regular(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ConvertResult>>> {
    let converted = ActionItemRepo::convert_to_regular(&state.pool, &auth.owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: ConvertResult { converted },
    }))
}

/// POST /api/v1/action-items/{id}/enhance
///
/// Returns the item's whole category after the merge.
pub async fn enhance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EnhanceItemRequest>,
) -> AppResult<Json<DataResponse<CategoryTree>>> {
    let tree = enhance::enhance_item(
        &state.pool,
        state.generator.as_ref(),
        &auth.owner_id,
        id,
        &input.transcript,
    )
    .await?;
    Ok(Json(DataResponse { data: tree }))
}

/// POST /api/v1/action-items/{id}/next-steps
pub async fn create_next_step(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateNextStep>,
) -> AppResult<(StatusCode, Json<DataResponse<NextStep>>)> {
    let text = require_text(&input.text, "text")?;
    let step = NextStepRepo::create(&state.pool, &auth.owner_id, id, &text, input.due_date)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: step })))
}
