//! Action item models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskvox_core::types::{DbId, DueDate, OwnerId, Timestamp};

/// A row from the `action_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActionItem {
    pub id: DbId,
    pub category_id: DbId,
    pub owner_id: OwnerId,
    pub text: String,
    pub status: String,
    pub item_type: String,
    pub due_date: Option<DueDate>,
    pub source_transcript_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding an action item to a category by hand.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateActionItem {
    pub text: String,
    /// `regular` (default) or `daily`.
    pub item_type: Option<String>,
    pub due_date: Option<DueDate>,
}

/// DTO for editing an action item. Only non-`None` fields are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateActionItem {
    pub text: Option<String>,
    pub due_date: Option<DueDate>,
}

/// DTO for the `pending` / `completed` toggle.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateActionItemStatus {
    pub status: String,
}
