//! Handlers for the refine flow: propose (read-only) then accept (Full
//! Replace).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskvox_core::structure::ProposedStructure;
use taskvox_db::models::hierarchy::{ApplySummary, CategoryTree};
use taskvox_pipeline::refine;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProposeRequest {
    pub instruction: String,
}

/// The proposal as the client sends it back. Kept as raw JSON so a
/// malformed proposal is reported as an invalid structure rather than a
/// body rejection.
#[derive(Debug, Deserialize)]
pub struct AcceptRequest {
    #[serde(rename = "proposedStructure")]
    pub proposed_structure: Value,
}

#[derive(Debug, Serialize)]
pub struct AcceptResult {
    pub summary: ApplySummary,
    pub categories: Vec<CategoryTree>,
}

/// POST /api/v1/refine/propose
pub async fn propose(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ProposeRequest>,
) -> AppResult<Json<DataResponse<ProposedStructure>>> {
    let proposal = refine::propose_refine(
        &state.pool,
        state.generator.as_ref(),
        &auth.owner_id,
        &input.instruction,
    )
    .await?;
    Ok(Json(DataResponse { data: proposal }))
}

/// POST /api/v1/refine/accept
///
/// Replaces the owner's entire hierarchy. Completion state and due dates on
/// the previous rows are not carried over.
pub async fn accept(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AcceptRequest>,
) -> AppResult<Json<DataResponse<AcceptResult>>> {
    let (summary, categories) =
        refine::accept_refine(&state.pool, &auth.owner_id, &input.proposed_structure).await?;

    tracing::info!(
        owner_id = %auth.owner_id,
        categories = summary.categories_created,
        deleted = summary.rows_deleted,
        "Refine proposal accepted",
    );
    Ok(Json(DataResponse {
        data: AcceptResult {
            summary,
            categories,
        },
    }))
}
