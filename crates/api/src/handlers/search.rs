use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use taskvox_db::models::hierarchy::CategoryTree;
use taskvox_db::repositories::HierarchyRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/search?q=
///
/// Case-insensitive substring match over category names, item text and
/// step text. Results keep the nesting; a blank query returns nothing.
pub async fn search(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<CategoryTree>>>> {
    let results = HierarchyRepo::search(&state.pool, &auth.owner_id, &params.q).await?;
    Ok(Json(DataResponse { data: results }))
}
