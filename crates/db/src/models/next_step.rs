//! Next step models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskvox_core::types::{DbId, DueDate, OwnerId, Timestamp};

/// A row from the `next_steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NextStep {
    pub id: DbId,
    pub action_item_id: DbId,
    pub owner_id: OwnerId,
    pub text: String,
    pub completed: bool,
    pub due_date: Option<DueDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNextStep {
    pub text: String,
    pub due_date: Option<DueDate>,
}

/// DTO for editing a next step. Only non-`None` fields are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNextStep {
    pub text: Option<String>,
    pub completed: Option<bool>,
    pub due_date: Option<DueDate>,
}
