//! Transactional upsert engine for the category → action item → next step
//! hierarchy.
//!
//! Every policy here runs inside a single transaction: either all of its
//! rows commit or none do. Inputs are the validator's output types from
//! `taskvox_core::structure`, so nothing unvalidated reaches these methods
//! from the AI path. Pre-conditions that need a read (target exists, all
//! combine sources owned) are checked before the transaction opens.
//!
//! Writes inside a transaction are strictly parent-before-child because each
//! insert needs the id returned by its parent's insert. Deletes are
//! child-first; the schema RESTRICTs parent deletes that would orphan rows.

use std::collections::{HashMap, HashSet};

use sqlx::{PgPool, Postgres, Transaction};
use taskvox_core::status::{ITEM_PENDING, ITEM_TYPE_REGULAR};
use taskvox_core::structure::{match_key, StructureCategory, StructureItem};
use taskvox_core::types::{DbId, DueDate};

use crate::models::action_item::ActionItem;
use crate::models::category::Category;
use crate::models::hierarchy::{build_trees, search_trees, ApplySummary, CategoryTree, HierarchyRow};
use crate::models::next_step::NextStep;
use crate::models::transcript::Transcript;
use crate::repositories::action_item_repo::{ActionItemRepo, COLUMNS as ITEM_COLUMNS};
use crate::repositories::category_repo::{CategoryRepo, COLUMNS as CATEGORY_COLUMNS};
use crate::repositories::next_step_repo::COLUMNS as STEP_COLUMNS;
use crate::repositories::transcript_repo::COLUMNS as TRANSCRIPT_COLUMNS;

type Tx<'a> = Transaction<'a, Postgres>;

/// Select list for the three-way join, aliased to [`HierarchyRow`] fields.
const TREE_COLUMNS: &str = "\
    c.id AS c_id, c.owner_id AS c_owner_id, c.name AS c_name, c.status AS c_status, \
    c.created_at AS c_created_at, c.updated_at AS c_updated_at, \
    i.id AS i_id, i.text AS i_text, i.status AS i_status, i.item_type AS i_item_type, \
    i.due_date AS i_due_date, i.source_transcript_id AS i_source_transcript_id, \
    i.created_at AS i_created_at, i.updated_at AS i_updated_at, \
    s.id AS s_id, s.text AS s_text, s.completed AS s_completed, s.due_date AS s_due_date, \
    s.created_at AS s_created_at, s.updated_at AS s_updated_at";

/// An item to insert under a category, with everything a copy must keep.
struct ItemInsert<'a> {
    text: &'a str,
    status: &'a str,
    item_type: &'a str,
    due_date: Option<DueDate>,
    source_transcript_id: Option<DbId>,
}

impl<'a> ItemInsert<'a> {
    fn fresh(text: &'a str, item_type: &'a str, source_transcript_id: Option<DbId>) -> Self {
        Self {
            text,
            status: ITEM_PENDING,
            item_type,
            due_date: None,
            source_transcript_id,
        }
    }
}

pub struct HierarchyRepo;

impl HierarchyRepo {
    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// The owner's full hierarchy as nested trees, in creation order.
    ///
    /// With `item_type` set, only items of that type are included, and
    /// categories that hold items but none of that type are omitted. Empty
    /// categories appear in every view.
    pub async fn load(
        pool: &PgPool,
        owner_id: &str,
        item_type: Option<&str>,
    ) -> Result<Vec<CategoryTree>, sqlx::Error> {
        let query = format!(
            "SELECT {TREE_COLUMNS} \
             FROM categories c \
             LEFT JOIN action_items i \
                 ON i.category_id = c.id AND i.owner_id = c.owner_id \
                 AND ($2::TEXT IS NULL OR i.item_type = $2) \
             LEFT JOIN next_steps s \
                 ON s.action_item_id = i.id AND s.owner_id = i.owner_id \
             WHERE c.owner_id = $1 \
               AND ($2::TEXT IS NULL \
                    OR i.id IS NOT NULL \
                    OR NOT EXISTS (SELECT 1 FROM action_items x \
                                   WHERE x.category_id = c.id AND x.owner_id = c.owner_id)) \
             ORDER BY c.id, i.id, s.id"
        );
        let rows = sqlx::query_as::<_, HierarchyRow>(&query)
            .bind(owner_id)
            .bind(item_type)
            .fetch_all(pool)
            .await?;
        Ok(build_trees(rows))
    }

    /// One category as a tree. `None` if it does not exist for this owner.
    pub async fn load_category(
        pool: &PgPool,
        owner_id: &str,
        category_id: DbId,
    ) -> Result<Option<CategoryTree>, sqlx::Error> {
        let query = format!(
            "SELECT {TREE_COLUMNS} \
             FROM categories c \
             LEFT JOIN action_items i ON i.category_id = c.id AND i.owner_id = c.owner_id \
             LEFT JOIN next_steps s ON s.action_item_id = i.id AND s.owner_id = i.owner_id \
             WHERE c.owner_id = $1 AND c.id = $2 \
             ORDER BY c.id, i.id, s.id"
        );
        let rows = sqlx::query_as::<_, HierarchyRow>(&query)
            .bind(owner_id)
            .bind(category_id)
            .fetch_all(pool)
            .await?;
        Ok(build_trees(rows).into_iter().next())
    }

    /// Trees for a chosen set of categories (all of them when `ids` is `None`).
    pub async fn load_selected(
        pool: &PgPool,
        owner_id: &str,
        ids: Option<&[DbId]>,
    ) -> Result<Vec<CategoryTree>, sqlx::Error> {
        let trees = Self::load(pool, owner_id, None).await?;
        Ok(match ids {
            Some(ids) => trees
                .into_iter()
                .filter(|t| ids.contains(&t.category.id))
                .collect(),
            None => trees,
        })
    }

    /// Case-insensitive search over category names, item text and step text,
    /// returned as nested trees holding only the matching branches.
    pub async fn search(
        pool: &PgPool,
        owner_id: &str,
        query: &str,
    ) -> Result<Vec<CategoryTree>, sqlx::Error> {
        let trees = Self::load(pool, owner_id, None).await?;
        Ok(search_trees(trees, query))
    }

    // -----------------------------------------------------------------------
    // Full Replace
    // -----------------------------------------------------------------------

    /// Delete the owner's entire hierarchy and insert `categories` fresh.
    ///
    /// New items are `regular` and `pending`; new steps are not completed.
    /// Completion state of the old hierarchy is not carried over.
    pub async fn replace_all(
        pool: &PgPool,
        owner_id: &str,
        categories: &[StructureCategory],
    ) -> Result<ApplySummary, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut summary = ApplySummary::default();

        summary.rows_deleted = Self::delete_owner_hierarchy_inner(&mut tx, owner_id).await?;

        for category in categories {
            let created = Self::insert_category_inner(&mut tx, owner_id, &category.name).await?;
            summary.categories_created += 1;
            Self::insert_items_inner(
                &mut tx,
                owner_id,
                created.id,
                &category.items,
                ITEM_TYPE_REGULAR,
                None,
                &mut summary,
            )
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            owner_id,
            deleted = summary.rows_deleted,
            categories = summary.categories_created,
            items = summary.action_items_created,
            steps = summary.next_steps_created,
            "Hierarchy replaced",
        );
        Ok(summary)
    }

    // -----------------------------------------------------------------------
    // Additive Append
    // -----------------------------------------------------------------------

    /// Find or create one category by name (case-insensitive) and add one
    /// item per entry. Nothing is deleted.
    pub async fn append_to_named_category(
        pool: &PgPool,
        owner_id: &str,
        category_name: &str,
        entries: &[String],
        item_type: &str,
        source_transcript_id: Option<DbId>,
    ) -> Result<(Category, ApplySummary), sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut summary = ApplySummary::default();

        let category =
            Self::find_or_create_category_inner(&mut tx, owner_id, category_name, &mut summary)
                .await?;

        for entry in entries {
            Self::insert_item_inner(
                &mut tx,
                owner_id,
                category.id,
                &ItemInsert::fresh(entry, item_type, source_transcript_id),
            )
            .await?;
            summary.action_items_created += 1;
        }

        tx.commit().await?;

        tracing::info!(
            owner_id,
            category_id = category.id,
            items = summary.action_items_created,
            "Entries appended to category",
        );
        Ok((category, summary))
    }

    /// Additive append of a validated structure: for each category
    /// find-or-create by name, then add its items and their steps. Nothing
    /// is deleted.
    pub async fn append_structure(
        pool: &PgPool,
        owner_id: &str,
        categories: &[StructureCategory],
        item_type: &str,
        source_transcript_id: Option<DbId>,
    ) -> Result<ApplySummary, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut summary = ApplySummary::default();

        Self::append_structure_inner(
            &mut tx,
            owner_id,
            categories,
            item_type,
            source_transcript_id,
            &mut summary,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            owner_id,
            categories = summary.categories_created,
            items = summary.action_items_created,
            steps = summary.next_steps_created,
            "Structure appended",
        );
        Ok(summary)
    }

    /// Record a transcript and append the structure organized from it, in
    /// one transaction. New items reference the transcript; if any insert
    /// fails the transcript is rolled back with them.
    pub async fn ingest_structure(
        pool: &PgPool,
        owner_id: &str,
        text: &str,
        source: &str,
        categories: &[StructureCategory],
        item_type: &str,
    ) -> Result<(Transcript, ApplySummary), sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut summary = ApplySummary::default();

        let query = format!(
            "INSERT INTO transcripts (owner_id, text, source) \
             VALUES ($1, $2, $3) \
             RETURNING {TRANSCRIPT_COLUMNS}"
        );
        let transcript = sqlx::query_as::<_, Transcript>(&query)
            .bind(owner_id)
            .bind(text)
            .bind(source)
            .fetch_one(&mut *tx)
            .await?;

        Self::append_structure_inner(
            &mut tx,
            owner_id,
            categories,
            item_type,
            Some(transcript.id),
            &mut summary,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            owner_id,
            transcript_id = transcript.id,
            categories = summary.categories_created,
            items = summary.action_items_created,
            steps = summary.next_steps_created,
            "Transcript ingested",
        );
        Ok((transcript, summary))
    }

    // -----------------------------------------------------------------------
    // Additive Merge
    // -----------------------------------------------------------------------

    /// Merge into one action item: optionally overwrite its text, then add
    /// the steps whose text is not already present (case-insensitive).
    ///
    /// Never deletes. Returns `None` if the item does not exist for this owner.
    pub async fn merge_into_item(
        pool: &PgPool,
        owner_id: &str,
        item_id: DbId,
        new_text: Option<&str>,
        steps: &[String],
    ) -> Result<Option<ApplySummary>, sqlx::Error> {
        let Some(item) = ActionItemRepo::find_by_id(pool, owner_id, item_id).await? else {
            return Ok(None);
        };

        let mut tx = pool.begin().await?;
        let mut summary = ApplySummary::default();

        if let Some(text) = new_text.map(str::trim).filter(|t| !t.is_empty() && *t != item.text) {
            sqlx::query("UPDATE action_items SET text = $3 WHERE id = $1 AND owner_id = $2")
                .bind(item_id)
                .bind(owner_id)
                .bind(text)
                .execute(&mut *tx)
                .await?;
        }

        summary.next_steps_created =
            Self::insert_missing_steps_inner(&mut tx, owner_id, item_id, steps).await?;

        tx.commit().await?;

        tracing::info!(
            owner_id,
            action_item_id = item_id,
            steps = summary.next_steps_created,
            "Merged into action item",
        );
        Ok(Some(summary))
    }

    /// Merge into one category: optionally overwrite its name; items whose
    /// text matches an existing item (case-insensitive) add their missing
    /// steps to it, other items are inserted with their steps.
    ///
    /// Never deletes. Returns `None` if the category does not exist for this
    /// owner.
    pub async fn merge_into_category(
        pool: &PgPool,
        owner_id: &str,
        category_id: DbId,
        new_name: Option<&str>,
        items: &[StructureItem],
        item_type: &str,
    ) -> Result<Option<ApplySummary>, sqlx::Error> {
        let Some(category) = CategoryRepo::find_by_id(pool, owner_id, category_id).await? else {
            return Ok(None);
        };

        let mut tx = pool.begin().await?;
        let mut summary = ApplySummary::default();

        if let Some(name) = new_name.map(str::trim).filter(|n| !n.is_empty() && *n != category.name) {
            sqlx::query("UPDATE categories SET name = $3 WHERE id = $1 AND owner_id = $2")
                .bind(category_id)
                .bind(owner_id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        let existing: Vec<(DbId, String)> = sqlx::query_as(
            "SELECT id, text FROM action_items \
             WHERE category_id = $1 AND owner_id = $2 \
             ORDER BY id",
        )
        .bind(category_id)
        .bind(owner_id)
        .fetch_all(&mut *tx)
        .await?;

        let mut by_key: HashMap<String, DbId> = HashMap::new();
        for (id, text) in existing {
            by_key.entry(match_key(&text)).or_insert(id);
        }

        for incoming in items {
            let key = match_key(&incoming.action_item);
            let target_id = match by_key.get(&key) {
                Some(&id) => id,
                None => {
                    let created = Self::insert_item_inner(
                        &mut tx,
                        owner_id,
                        category_id,
                        &ItemInsert::fresh(&incoming.action_item, item_type, None),
                    )
                    .await?;
                    summary.action_items_created += 1;
                    by_key.insert(key, created.id);
                    created.id
                }
            };
            summary.next_steps_created +=
                Self::insert_missing_steps_inner(&mut tx, owner_id, target_id, &incoming.next_steps)
                    .await?;
        }

        tx.commit().await?;

        tracing::info!(
            owner_id,
            category_id,
            items = summary.action_items_created,
            steps = summary.next_steps_created,
            "Merged into category",
        );
        Ok(Some(summary))
    }

    // -----------------------------------------------------------------------
    // Combine
    // -----------------------------------------------------------------------

    /// Combine several categories into one new category named `name`.
    ///
    /// Items (all of them, or only `selected_item_ids` when given) and their
    /// steps are copied under the new category keeping type, status, due
    /// dates, completion and transcript references; then every step, item
    /// and category under the sources is deleted. Unselected items are
    /// deleted with their sources.
    ///
    /// `category_ids` must already be de-duplicated. Returns `None` without
    /// opening a transaction if any id is not owned by the caller.
    pub async fn combine_categories(
        pool: &PgPool,
        owner_id: &str,
        category_ids: &[DbId],
        selected_item_ids: Option<&[DbId]>,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let owned = CategoryRepo::list_by_ids(pool, owner_id, category_ids).await?;
        if owned.len() != category_ids.len() {
            return Ok(None);
        }

        let mut tx = pool.begin().await?;

        let combined = Self::insert_category_inner(&mut tx, owner_id, name).await?;

        let item_query = format!(
            "SELECT {ITEM_COLUMNS} FROM action_items \
             WHERE owner_id = $1 AND category_id = ANY($2) \
             ORDER BY id"
        );
        let items = sqlx::query_as::<_, ActionItem>(&item_query)
            .bind(owner_id)
            .bind(category_ids)
            .fetch_all(&mut *tx)
            .await?;

        let item_ids: Vec<DbId> = items.iter().map(|i| i.id).collect();
        let step_query = format!(
            "SELECT {STEP_COLUMNS} FROM next_steps \
             WHERE owner_id = $1 AND action_item_id = ANY($2) \
             ORDER BY id"
        );
        let steps = sqlx::query_as::<_, NextStep>(&step_query)
            .bind(owner_id)
            .bind(&item_ids)
            .fetch_all(&mut *tx)
            .await?;

        let mut steps_by_item: HashMap<DbId, Vec<NextStep>> = HashMap::new();
        for step in steps {
            steps_by_item.entry(step.action_item_id).or_default().push(step);
        }

        let mut copied = 0u64;
        for item in items
            .iter()
            .filter(|i| selected_item_ids.map_or(true, |sel| sel.contains(&i.id)))
        {
            let copy = Self::insert_item_inner(
                &mut tx,
                owner_id,
                combined.id,
                &ItemInsert {
                    text: &item.text,
                    status: &item.status,
                    item_type: &item.item_type,
                    due_date: item.due_date,
                    source_transcript_id: item.source_transcript_id,
                },
            )
            .await?;
            copied += 1;

            for step in steps_by_item.get(&item.id).into_iter().flatten() {
                sqlx::query(
                    "INSERT INTO next_steps (action_item_id, owner_id, text, completed, due_date) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(copy.id)
                .bind(owner_id)
                .bind(&step.text)
                .bind(step.completed)
                .bind(step.due_date)
                .execute(&mut *tx)
                .await?;
            }
        }

        for &source_id in category_ids {
            Self::delete_category_subtree_inner(&mut tx, owner_id, source_id).await?;
        }

        tx.commit().await?;

        tracing::info!(
            owner_id,
            combined_category_id = combined.id,
            sources = category_ids.len(),
            items = copied,
            "Categories combined",
        );
        Ok(Some(combined))
    }

    // -----------------------------------------------------------------------
    // Cascade delete
    // -----------------------------------------------------------------------

    /// Delete one category with its items and their steps, child-first, in
    /// one transaction. Returns `true` if the category existed for this owner.
    pub async fn delete_category_subtree(
        pool: &PgPool,
        owner_id: &str,
        category_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let deleted = Self::delete_category_subtree_inner(&mut tx, owner_id, category_id).await?;
        if deleted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        tracing::info!(owner_id, category_id, rows = deleted, "Category subtree deleted");
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Transaction-scoped helpers
    // -----------------------------------------------------------------------

    /// Returns the total number of rows deleted, or 0 if the category itself
    /// did not exist for this owner.
    async fn delete_category_subtree_inner(
        tx: &mut Tx<'_>,
        owner_id: &str,
        category_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let steps = sqlx::query(
            "DELETE FROM next_steps \
             WHERE owner_id = $1 AND action_item_id IN \
                 (SELECT id FROM action_items WHERE category_id = $2 AND owner_id = $1)",
        )
        .bind(owner_id)
        .bind(category_id)
        .execute(&mut **tx)
        .await?;

        let items = sqlx::query("DELETE FROM action_items WHERE category_id = $2 AND owner_id = $1")
            .bind(owner_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await?;

        let categories = sqlx::query("DELETE FROM categories WHERE id = $2 AND owner_id = $1")
            .bind(owner_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await?;

        if categories.rows_affected() == 0 {
            return Ok(0);
        }
        Ok(steps.rows_affected() + items.rows_affected() + categories.rows_affected())
    }

    async fn delete_owner_hierarchy_inner(tx: &mut Tx<'_>, owner_id: &str) -> Result<u64, sqlx::Error> {
        let mut deleted = 0;
        for statement in [
            "DELETE FROM next_steps WHERE owner_id = $1",
            "DELETE FROM action_items WHERE owner_id = $1",
            "DELETE FROM categories WHERE owner_id = $1",
        ] {
            deleted += sqlx::query(statement)
                .bind(owner_id)
                .execute(&mut **tx)
                .await?
                .rows_affected();
        }
        Ok(deleted)
    }

    async fn append_structure_inner(
        tx: &mut Tx<'_>,
        owner_id: &str,
        categories: &[StructureCategory],
        item_type: &str,
        source_transcript_id: Option<DbId>,
        summary: &mut ApplySummary,
    ) -> Result<(), sqlx::Error> {
        for category in categories {
            let target =
                Self::find_or_create_category_inner(tx, owner_id, &category.name, summary).await?;
            Self::insert_items_inner(
                tx,
                owner_id,
                target.id,
                &category.items,
                item_type,
                source_transcript_id,
                summary,
            )
            .await?;
        }
        Ok(())
    }

    async fn insert_category_inner(
        tx: &mut Tx<'_>,
        owner_id: &str,
        name: &str,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (owner_id, name) VALUES ($1, $2) RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(owner_id)
            .bind(name.trim())
            .fetch_one(&mut **tx)
            .await
    }

    /// Oldest category with the same name (case-insensitive), or a new one.
    async fn find_or_create_category_inner(
        tx: &mut Tx<'_>,
        owner_id: &str,
        name: &str,
        summary: &mut ApplySummary,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE owner_id = $1 AND lower(btrim(name)) = lower(btrim($2)) \
             ORDER BY id LIMIT 1"
        );
        let existing = sqlx::query_as::<_, Category>(&query)
            .bind(owner_id)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;

        match existing {
            Some(category) => Ok(category),
            None => {
                summary.categories_created += 1;
                Self::insert_category_inner(tx, owner_id, name).await
            }
        }
    }

    async fn insert_item_inner(
        tx: &mut Tx<'_>,
        owner_id: &str,
        category_id: DbId,
        item: &ItemInsert<'_>,
    ) -> Result<ActionItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO action_items \
                 (category_id, owner_id, text, status, item_type, due_date, source_transcript_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, ActionItem>(&query)
            .bind(category_id)
            .bind(owner_id)
            .bind(item.text.trim())
            .bind(item.status)
            .bind(item.item_type)
            .bind(item.due_date)
            .bind(item.source_transcript_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert structure items (and their steps) under one category.
    async fn insert_items_inner(
        tx: &mut Tx<'_>,
        owner_id: &str,
        category_id: DbId,
        items: &[StructureItem],
        item_type: &str,
        source_transcript_id: Option<DbId>,
        summary: &mut ApplySummary,
    ) -> Result<(), sqlx::Error> {
        for item in items {
            let created = Self::insert_item_inner(
                tx,
                owner_id,
                category_id,
                &ItemInsert::fresh(&item.action_item, item_type, source_transcript_id),
            )
            .await?;
            summary.action_items_created += 1;

            for step in &item.next_steps {
                Self::insert_step_inner(tx, owner_id, created.id, step).await?;
                summary.next_steps_created += 1;
            }
        }
        Ok(())
    }

    async fn insert_step_inner(
        tx: &mut Tx<'_>,
        owner_id: &str,
        action_item_id: DbId,
        text: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO next_steps (action_item_id, owner_id, text) VALUES ($1, $2, $3)")
            .bind(action_item_id)
            .bind(owner_id)
            .bind(text.trim())
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Insert the steps whose text is not already on the item, de-duplicating
    /// the input too. Returns the number inserted.
    async fn insert_missing_steps_inner(
        tx: &mut Tx<'_>,
        owner_id: &str,
        action_item_id: DbId,
        steps: &[String],
    ) -> Result<u64, sqlx::Error> {
        if steps.is_empty() {
            return Ok(0);
        }

        let existing: Vec<(String,)> = sqlx::query_as(
            "SELECT text FROM next_steps WHERE action_item_id = $1 AND owner_id = $2",
        )
        .bind(action_item_id)
        .bind(owner_id)
        .fetch_all(&mut **tx)
        .await?;

        let mut seen: HashSet<String> = existing.iter().map(|(t,)| match_key(t)).collect();
        let mut inserted = 0;

        for step in steps {
            let key = match_key(step);
            if key.is_empty() || !seen.insert(key) {
                continue;
            }
            Self::insert_step_inner(tx, owner_id, action_item_id, step).await?;
            inserted += 1;
        }
        Ok(inserted)
    }
}
