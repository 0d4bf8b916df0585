//! Repository for the `categories` table.
//!
//! Subtree deletion lives on [`super::HierarchyRepo`] because it touches all
//! three tables.

use sqlx::PgPool;
use taskvox_core::status::{ITEM_TYPE_DAILY, ITEM_TYPE_REGULAR};
use taskvox_core::types::DbId;

use crate::models::category::Category;

/// Column list for `categories` queries.
pub(crate) const COLUMNS: &str = "id, owner_id, name, status, created_at, updated_at";

pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create(pool: &PgPool, owner_id: &str, name: &str) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (owner_id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(owner_id)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        owner_id: &str,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND owner_id = $2");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(owner_id)
            .fetch_optional(pool)
            .await
    }

    /// All of the owner's categories, oldest first.
    pub async fn list(pool: &PgPool, owner_id: &str) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE owner_id = $1 ORDER BY id");
        sqlx::query_as::<_, Category>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// The subset of `ids` the owner actually owns, in id order.
    pub async fn list_by_ids(
        pool: &PgPool,
        owner_id: &str,
        ids: &[DbId],
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories \
             WHERE owner_id = $1 AND id = ANY($2) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(owner_id)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Rename a category. Returns `None` if it does not exist for this owner.
    pub async fn rename(
        pool: &PgPool,
        owner_id: &str,
        id: DbId,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET name = $3 \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Completion toggle: set the category status and cascade it to every
    /// action item (`completed` / `pending`) and next step (`completed`
    /// flag) underneath, in one transaction.
    ///
    /// The three target values come from
    /// [`taskvox_core::status::cascade_targets`].
    pub async fn set_status_cascade(
        pool: &PgPool,
        owner_id: &str,
        id: DbId,
        (category_status, item_status, step_completed): (&str, &str, bool),
    ) -> Result<Option<Category>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE categories SET status = $3 \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        let Some(category) = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(category_status)
            .fetch_optional(&mut *tx)
            .await?
        else {
            tx.rollback().await?;
            return Ok(None);
        };

        let items = sqlx::query(
            "UPDATE action_items SET status = $3 \
             WHERE category_id = $1 AND owner_id = $2 AND status <> $3",
        )
        .bind(id)
        .bind(owner_id)
        .bind(item_status)
        .execute(&mut *tx)
        .await?;

        let steps = sqlx::query(
            "UPDATE next_steps SET completed = $3 \
             WHERE owner_id = $2 AND completed <> $3 \
               AND action_item_id IN \
                   (SELECT id FROM action_items WHERE category_id = $1 AND owner_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .bind(step_completed)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            category_id = id,
            status = category_status,
            items = items.rows_affected(),
            steps = steps.rows_affected(),
            "Category status cascaded",
        );
        Ok(Some(category))
    }

    /// Convert every `daily` item in the category to `regular`.
    ///
    /// Returns `None` if the category does not exist for this owner, else the
    /// number of items converted (zero when none were daily).
    pub async fn convert_items_to_regular(
        pool: &PgPool,
        owner_id: &str,
        id: DbId,
    ) -> Result<Option<u64>, sqlx::Error> {
        if Self::find_by_id(pool, owner_id, id).await?.is_none() {
            return Ok(None);
        }

        let result = sqlx::query(
            "UPDATE action_items SET item_type = $3 \
             WHERE category_id = $1 AND owner_id = $2 AND item_type = $4",
        )
        .bind(id)
        .bind(owner_id)
        .bind(ITEM_TYPE_REGULAR)
        .bind(ITEM_TYPE_DAILY)
        .execute(pool)
        .await?;

        Ok(Some(result.rows_affected()))
    }
}
