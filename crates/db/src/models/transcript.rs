//! Transcript models. Transcripts are append-only; there is no update DTO.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskvox_core::types::{DbId, OwnerId, Timestamp};

/// A row from the `transcripts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Transcript {
    pub id: DbId,
    pub owner_id: OwnerId,
    pub text: String,
    pub source: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Query parameters for `GET /api/v1/transcripts`.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
