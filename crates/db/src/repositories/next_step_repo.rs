//! Repository for the `next_steps` table.

use sqlx::PgPool;
use taskvox_core::types::{DbId, DueDate};

use crate::models::next_step::{NextStep, UpdateNextStep};

/// Column list for `next_steps` queries.
pub(crate) const COLUMNS: &str =
    "id, action_item_id, owner_id, text, completed, due_date, created_at, updated_at";

pub struct NextStepRepo;

impl NextStepRepo {
    /// Add a step to one of the owner's action items.
    ///
    /// Returns `None` if the item does not exist for this owner.
    pub async fn create(
        pool: &PgPool,
        owner_id: &str,
        action_item_id: DbId,
        text: &str,
        due_date: Option<DueDate>,
    ) -> Result<Option<NextStep>, sqlx::Error> {
        let query = format!(
            "INSERT INTO next_steps (action_item_id, owner_id, text, due_date) \
             SELECT i.id, i.owner_id, $3, $4 FROM action_items i \
             WHERE i.id = $1 AND i.owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NextStep>(&query)
            .bind(action_item_id)
            .bind(owner_id)
            .bind(text)
            .bind(due_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_item(
        pool: &PgPool,
        owner_id: &str,
        action_item_id: DbId,
    ) -> Result<Vec<NextStep>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM next_steps \
             WHERE action_item_id = $1 AND owner_id = $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, NextStep>(&query)
            .bind(action_item_id)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Edit text, completion and/or due date. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        owner_id: &str,
        id: DbId,
        input: &UpdateNextStep,
    ) -> Result<Option<NextStep>, sqlx::Error> {
        let query = format!(
            "UPDATE next_steps SET \
                 text = COALESCE($3, text), \
                 completed = COALESCE($4, completed), \
                 due_date = COALESCE($5, due_date) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NextStep>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(input.text.as_deref().map(str::trim))
            .bind(input.completed)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a step was deleted.
    pub async fn delete(pool: &PgPool, owner_id: &str, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM next_steps WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
