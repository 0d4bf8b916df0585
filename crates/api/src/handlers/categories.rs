//! Handlers for categories and the operations on whole subtrees.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskvox_core::combine::validate_category_name;
use taskvox_core::error::CoreError;
use taskvox_core::status::{cascade_targets, validate_item_type, ITEM_TYPE_REGULAR};
use taskvox_core::types::DbId;
use taskvox_db::models::action_item::{ActionItem, CreateActionItem};
use taskvox_db::models::category::{
    Category, CreateCategory, UpdateCategory, UpdateCategoryStatus,
};
use taskvox_db::models::hierarchy::CategoryTree;
use taskvox_db::repositories::{ActionItemRepo, CategoryRepo, HierarchyRepo};
use taskvox_pipeline::combine::{self, CombineRequest};
use taskvox_pipeline::enhance;

use crate::error::{AppError, AppResult};
use crate::handlers::{require_text, ConvertResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Category",
        id,
    })
}

#[derive(Debug, Deserialize)]
pub struct CategoryListParams {
    /// `regular` or `daily`; omitted means every item.
    pub item_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceCategoryRequest {
    pub transcript: String,
    pub item_type: Option<String>,
}

/// GET /api/v1/categories?item_type=
///
/// The owner's nested hierarchy. With `item_type`, categories holding only
/// items of another type are left out; empty categories are always listed.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CategoryListParams>,
) -> AppResult<Json<DataResponse<Vec<CategoryTree>>>> {
    if let Some(item_type) = params.item_type.as_deref() {
        validate_item_type(item_type)?;
    }
    let trees =
        HierarchyRepo::load(&state.pool, &auth.owner_id, params.item_type.as_deref()).await?;
    Ok(Json(DataResponse { data: trees }))
}

/// POST /api/v1/categories
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    let name = validate_category_name(&input.name)?;
    let category = CategoryRepo::create(&state.pool, &auth.owner_id, &name).await?;

    tracing::info!(category_id = category.id, owner_id = %auth.owner_id, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/categories/{id}
pub async fn rename(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    let name = validate_category_name(&input.name)?;
    let category = CategoryRepo::rename(&state.pool, &auth.owner_id, id, &name)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Removes the category with all of its items and their steps.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if HierarchyRepo::delete_category_subtree(&state.pool, &auth.owner_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// PUT /api/v1/categories/{id}/status
///
/// Completing a category completes everything under it; reactivating it
/// reopens everything.
pub async fn set_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategoryStatus>,
) -> AppResult<Json<DataResponse<CategoryTree>>> {
    let targets = cascade_targets(&input.status)?;
    CategoryRepo::set_status_cascade(&state.pool, &auth.owner_id, id, targets)
        .await?
        .ok_or_else(|| not_found(id))?;

    let tree = HierarchyRepo::load_category(&state.pool, &auth.owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: tree }))
}

/// POST /api/v1/categories/{id}/convert-to-regular
pub async fn convert_to_regular(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ConvertResult>>> {
    let converted = CategoryRepo::convert_items_to_regular(&state.pool, &auth.owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(category_id = id, converted, "Daily items converted to regular");
    Ok(Json(DataResponse {
        data: ConvertResult { converted },
    }))
}

/// POST /api/v1/categories/{id}/enhance
pub async fn enhance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EnhanceCategoryRequest>,
) -> AppResult<Json<DataResponse<CategoryTree>>> {
    let item_type = input.item_type.as_deref().unwrap_or(ITEM_TYPE_REGULAR);
    let tree = enhance::enhance_category(
        &state.pool,
        state.generator.as_ref(),
        &auth.owner_id,
        id,
        &input.transcript,
        item_type,
    )
    .await?;
    Ok(Json(DataResponse { data: tree }))
}

/// POST /api/v1/categories/{id}/items
pub async fn create_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateActionItem>,
) -> AppResult<(StatusCode, Json<DataResponse<ActionItem>>)> {
    let text = require_text(&input.text, "text")?;
    let item_type = input.item_type.as_deref().unwrap_or(ITEM_TYPE_REGULAR);
    validate_item_type(item_type)?;

    let item = ActionItemRepo::create(
        &state.pool,
        &auth.owner_id,
        id,
        &text,
        item_type,
        input.due_date,
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// POST /api/v1/categories/combine
///
/// Body: `{category_ids, item_ids?, name?, mode?}`. Returns the new category.
pub async fn combine(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CombineRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CategoryTree>>)> {
    let tree = combine::combine(
        &state.pool,
        state.generator.as_ref(),
        &auth.owner_id,
        &input,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: tree })))
}
