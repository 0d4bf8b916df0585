//! Repository for the append-only `transcripts` table.

use sqlx::PgPool;
use taskvox_core::types::DbId;

use crate::models::transcript::Transcript;

/// Column list for `transcripts` queries.
pub(crate) const COLUMNS: &str = "id, owner_id, text, source, created_at, updated_at";

/// Default page size for transcript history.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for transcript history.
const MAX_LIMIT: i64 = 200;

pub struct TranscriptRepo;

impl TranscriptRepo {
    /// Record a transcript. There is no update or delete.
    pub async fn create(
        pool: &PgPool,
        owner_id: &str,
        text: &str,
        source: &str,
    ) -> Result<Transcript, sqlx::Error> {
        let query = format!(
            "INSERT INTO transcripts (owner_id, text, source) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transcript>(&query)
            .bind(owner_id)
            .bind(text)
            .bind(source)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: &str,
        id: DbId,
    ) -> Result<Option<Transcript>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM transcripts WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Transcript>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Newest first, paginated.
    pub async fn list(
        pool: &PgPool,
        owner_id: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Transcript>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT {COLUMNS} FROM transcripts \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Transcript>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
