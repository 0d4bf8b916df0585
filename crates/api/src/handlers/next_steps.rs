//! Handlers for next steps.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskvox_core::error::CoreError;
use taskvox_core::types::DbId;
use taskvox_db::models::next_step::{NextStep, UpdateNextStep};
use taskvox_db::repositories::NextStepRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::require_text;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "NextStep",
        id,
    })
}

/// PUT /api/v1/next-steps/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNextStep>,
) -> AppResult<Json<DataResponse<NextStep>>> {
    if let Some(text) = input.text.as_deref() {
        require_text(text, "text")?;
    }
    let step = NextStepRepo::update(&state.pool, &auth.owner_id, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: step }))
}

/// DELETE /api/v1/next-steps/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if NextStepRepo::delete(&state.pool, &auth.owner_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
