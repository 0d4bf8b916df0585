//! Nested category trees and the flat join rows they are rebuilt from.

use serde::Serialize;
use sqlx::FromRow;
use taskvox_core::grouping::group_ordered;
use taskvox_core::structure::{StructureCategory, StructureItem};
use taskvox_core::types::{DbId, DueDate, OwnerId, Timestamp};

use super::action_item::ActionItem;
use super::category::Category;
use super::next_step::NextStep;

// ---------------------------------------------------------------------------
// Trees
// ---------------------------------------------------------------------------

/// An action item with its next steps.
#[derive(Debug, Clone, Serialize)]
pub struct ActionItemTree {
    #[serde(flatten)]
    pub item: ActionItem,
    pub next_steps: Vec<NextStep>,
}

/// A category with its action items and their next steps.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: Category,
    pub items: Vec<ActionItemTree>,
}

impl CategoryTree {
    /// Strip ids, statuses and timestamps, leaving the `{name, items:[{actionItem,
    /// nextSteps}]}` shape used by prompts and outbound mail.
    pub fn to_structure(&self) -> StructureCategory {
        StructureCategory {
            name: self.category.name.clone(),
            items: self
                .items
                .iter()
                .map(|it| StructureItem {
                    action_item: it.item.text.clone(),
                    next_steps: it.next_steps.iter().map(|s| s.text.clone()).collect(),
                })
                .collect(),
        }
    }

    /// Keep only the parts of this tree that match `needle` (already
    /// lowercased).
    ///
    /// A category whose name matches is kept whole. An item whose text
    /// matches is kept with all its steps. Any other item is kept only with
    /// its matching steps, and dropped if none match.
    fn filter_by_needle(mut self, needle: &str) -> Option<Self> {
        let matches = |text: &str| text.to_lowercase().contains(needle);

        if matches(&self.category.name) {
            return Some(self);
        }

        self.items = self
            .items
            .into_iter()
            .filter_map(|mut tree| {
                if matches(&tree.item.text) {
                    return Some(tree);
                }
                tree.next_steps.retain(|s| matches(&s.text));
                (!tree.next_steps.is_empty()).then_some(tree)
            })
            .collect();

        (!self.items.is_empty()).then_some(self)
    }
}

/// Case-insensitive substring search over a set of trees.
///
/// A blank query matches nothing.
pub fn search_trees(trees: Vec<CategoryTree>, query: &str) -> Vec<CategoryTree> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    trees
        .into_iter()
        .filter_map(|tree| tree.filter_by_needle(&needle))
        .collect()
}

/// Row counts written by one upsert policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    pub categories_created: u64,
    pub action_items_created: u64,
    pub next_steps_created: u64,
    pub rows_deleted: u64,
}

// ---------------------------------------------------------------------------
// Flat join rows
// ---------------------------------------------------------------------------

/// One row of `categories LEFT JOIN action_items LEFT JOIN next_steps`.
///
/// Item and step columns are `NULL` when the parent has no children.
#[derive(Debug, Clone, FromRow)]
pub struct HierarchyRow {
    pub c_id: DbId,
    pub c_owner_id: OwnerId,
    pub c_name: String,
    pub c_status: String,
    pub c_created_at: Timestamp,
    pub c_updated_at: Timestamp,

    pub i_id: Option<DbId>,
    pub i_text: Option<String>,
    pub i_status: Option<String>,
    pub i_item_type: Option<String>,
    pub i_due_date: Option<DueDate>,
    pub i_source_transcript_id: Option<DbId>,
    pub i_created_at: Option<Timestamp>,
    pub i_updated_at: Option<Timestamp>,

    pub s_id: Option<DbId>,
    pub s_text: Option<String>,
    pub s_completed: Option<bool>,
    pub s_due_date: Option<DueDate>,
    pub s_created_at: Option<Timestamp>,
    pub s_updated_at: Option<Timestamp>,
}

impl HierarchyRow {
    fn category(&self) -> Category {
        Category {
            id: self.c_id,
            owner_id: self.c_owner_id.clone(),
            name: self.c_name.clone(),
            status: self.c_status.clone(),
            created_at: self.c_created_at,
            updated_at: self.c_updated_at,
        }
    }

    fn action_item(&self) -> Option<ActionItem> {
        Some(ActionItem {
            id: self.i_id?,
            category_id: self.c_id,
            owner_id: self.c_owner_id.clone(),
            text: self.i_text.clone()?,
            status: self.i_status.clone()?,
            item_type: self.i_item_type.clone()?,
            due_date: self.i_due_date,
            source_transcript_id: self.i_source_transcript_id,
            created_at: self.i_created_at?,
            updated_at: self.i_updated_at?,
        })
    }

    fn next_step(&self) -> Option<NextStep> {
        Some(NextStep {
            id: self.s_id?,
            action_item_id: self.i_id?,
            owner_id: self.c_owner_id.clone(),
            text: self.s_text.clone()?,
            completed: self.s_completed?,
            due_date: self.s_due_date,
            created_at: self.s_created_at?,
            updated_at: self.s_updated_at?,
        })
    }
}

/// Rebuild nested trees from rows ordered by category, item, step.
pub fn build_trees(rows: Vec<HierarchyRow>) -> Vec<CategoryTree> {
    group_ordered(rows, |r| r.c_id)
        .into_iter()
        .map(|(_, category_rows)| {
            let category = category_rows[0].category();

            let items = group_ordered(
                category_rows.into_iter().filter(|r| r.i_id.is_some()),
                |r| r.i_id,
            )
            .into_iter()
            .filter_map(|(_, item_rows)| {
                let item = item_rows[0].action_item()?;
                let next_steps = item_rows.iter().filter_map(HierarchyRow::next_step).collect();
                Some(ActionItemTree { item, next_steps })
            })
            .collect();

            CategoryTree { category, items }
        })
        .collect()
}
