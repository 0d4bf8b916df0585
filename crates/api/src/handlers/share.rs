use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskvox_core::types::DbId;
use taskvox_db::models::hierarchy::CategoryTree;
use taskvox_db::repositories::HierarchyRepo;
use taskvox_notify::DEFAULT_SUBJECT;

use crate::error::{AppError, AppResult};
use crate::handlers::require_text;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ShareEmailRequest {
    pub to: String,
    pub subject: Option<String>,
    /// Only these categories; omitted means the whole list.
    pub category_ids: Option<Vec<DbId>>,
}

#[derive(Debug, Serialize)]
pub struct ShareResult {
    pub sent_to: String,
    pub categories: usize,
}

/// POST /api/v1/share/email
///
/// Emails the nested list as plain text and HTML. Returns 503 when SMTP is
/// not configured.
pub async fn share_email(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ShareEmailRequest>,
) -> AppResult<Json<DataResponse<ShareResult>>> {
    let mailer = state
        .mailer
        .as_ref()
        .ok_or_else(|| AppError::ServiceUnavailable("Email sharing is not configured".into()))?;

    let to = require_text(&input.to, "to")?;
    let subject = input
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUBJECT);

    let trees =
        HierarchyRepo::load_selected(&state.pool, &auth.owner_id, input.category_ids.as_deref())
            .await?;
    let structure: Vec<_> = trees.iter().map(CategoryTree::to_structure).collect();

    mailer.send_list(&to, subject, &structure).await?;

    Ok(Json(DataResponse {
        data: ShareResult {
            sent_to: to,
            categories: structure.len(),
        },
    }))
}
