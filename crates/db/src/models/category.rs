//! Category models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskvox_core::types::{DbId, OwnerId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub owner_id: OwnerId,
    pub name: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a category directly.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

/// DTO for renaming a category.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategory {
    pub name: String,
}

/// DTO for the completion toggle. Accepts `active`, `completed` or `pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCategoryStatus {
    pub status: String,
}
