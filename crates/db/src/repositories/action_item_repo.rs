//! Repository for the `action_items` table.

use sqlx::PgPool;
use taskvox_core::status::{ITEM_TYPE_DAILY, ITEM_TYPE_REGULAR};
use taskvox_core::types::{DbId, DueDate};

use crate::models::action_item::{ActionItem, UpdateActionItem};

/// Column list for `action_items` queries.
pub(crate) const COLUMNS: &str = "id, category_id, owner_id, text, status, item_type, \
    due_date, source_transcript_id, created_at, updated_at";

pub struct ActionItemRepo;

impl ActionItemRepo {
    /// Add an item to one of the owner's categories.
    ///
    /// Returns `None` if the category does not exist for this owner.
    pub async fn create(
        pool: &PgPool,
        owner_id: &str,
        category_id: DbId,
        text: &str,
        item_type: &str,
        due_date: Option<DueDate>,
    ) -> Result<Option<ActionItem>, sqlx::Error> {
        let query = format!(
            "INSERT INTO action_items (category_id, owner_id, text, item_type, due_date) \
             SELECT c.id, c.owner_id, $3, $4, $5 FROM categories c \
             WHERE c.id = $1 AND c.owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActionItem>(&query)
            .bind(category_id)
            .bind(owner_id)
            .bind(text)
            .bind(item_type)
            .bind(due_date)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: &str,
        id: DbId,
    ) -> Result<Option<ActionItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM action_items WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, ActionItem>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Items of one category, oldest first.
    pub async fn list_for_category(
        pool: &PgPool,
        owner_id: &str,
        category_id: DbId,
    ) -> Result<Vec<ActionItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM action_items \
             WHERE category_id = $1 AND owner_id = $2 \
             ORDER BY id"
        );
        sqlx::query_as::<_, ActionItem>(&query)
            .bind(category_id)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Edit text and/or due date. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        owner_id: &str,
        id: DbId,
        input: &UpdateActionItem,
    ) -> Result<Option<ActionItem>, sqlx::Error> {
        let query = format!(
            "UPDATE action_items SET \
                 text = COALESCE($3, text), \
                 due_date = COALESCE($4, due_date) \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActionItem>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(input.text.as_deref().map(str::trim))
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// `pending` ⇄ `completed`. The caller validates `status`.
    pub async fn set_status(
        pool: &PgPool,
        owner_id: &str,
        id: DbId,
        status: &str,
    ) -> Result<Option<ActionItem>, sqlx::Error> {
        let query = format!(
            "UPDATE action_items SET status = $3 \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActionItem>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// One-way `daily → regular` conversion.
    ///
    /// Returns `None` if the item does not exist for this owner, `Some(0)` if
    /// it was already regular (nothing is written), `Some(1)` otherwise.
    pub async fn convert_to_regular(
        pool: &PgPool,
        owner_id: &str,
        id: DbId,
    ) -> Result<Option<u64>, sqlx::Error> {
        if Self::find_by_id(pool, owner_id, id).await?.is_none() {
            return Ok(None);
        }

        let result = sqlx::query(
            "UPDATE action_items SET item_type = $3 \
             WHERE id = $1 AND owner_id = $2 AND item_type = $4",
        )
        .bind(id)
        .bind(owner_id)
        .bind(ITEM_TYPE_REGULAR)
        .bind(ITEM_TYPE_DAILY)
        .execute(pool)
        .await?;

        Ok(Some(result.rows_affected()))
    }

    /// Delete an item and its next steps in one transaction.
    ///
    /// Returns `true` if the item existed for this owner.
    pub async fn delete(pool: &PgPool, owner_id: &str, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM next_steps WHERE action_item_id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM action_items WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
