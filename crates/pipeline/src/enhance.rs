//! Enhance: extend one action item or one category with new spoken notes.
//!
//! Both flows ask the model for the categories shape and merge the reply
//! additively; nothing already in the hierarchy is deleted.

use sqlx::PgPool;
use taskvox_ai::TextGenerator;
use taskvox_core::prompts::{enhance_category_prompt, enhance_item_prompt};
use taskvox_core::status::validate_item_type;
use taskvox_core::structure::{StructureCategory, StructureItem, ValidationError};
use taskvox_core::types::DbId;
use taskvox_db::models::hierarchy::CategoryTree;
use taskvox_db::repositories::{ActionItemRepo, HierarchyRepo};

use crate::error::PipelineError;
use crate::structured::generate_categories;

/// Merge the model's take on one action item back into it: the reply's item
/// text replaces the item text and its next steps are added if new.
///
/// Returns the item's category as it stands afterwards.
pub async fn enhance_item(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    owner_id: &str,
    item_id: DbId,
    transcript: &str,
) -> Result<CategoryTree, PipelineError> {
    let transcript = require_text(transcript)?;
    let item = ActionItemRepo::find_by_id(pool, owner_id, item_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("action item", item_id))?;
    let category = HierarchyRepo::load_category(pool, owner_id, item.category_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("category", item.category_id))?;

    let existing_steps: Vec<String> = category
        .items
        .iter()
        .find(|t| t.item.id == item_id)
        .map(|t| t.next_steps.iter().map(|s| s.text.clone()).collect())
        .unwrap_or_default();

    let prompt = enhance_item_prompt(&category.category.name, &item.text, &existing_steps, transcript);
    let reply = generate_categories(generator, "enhance_item", &prompt).await?;
    let enhanced = first_item(reply)?;

    HierarchyRepo::merge_into_item(
        pool,
        owner_id,
        item_id,
        Some(&enhanced.action_item),
        &enhanced.next_steps,
    )
    .await?
    .ok_or_else(|| PipelineError::not_found("action item", item_id))?;

    HierarchyRepo::load_category(pool, owner_id, item.category_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("category", item.category_id))
}

/// Merge the model's take on one category back into it: the reply's name
/// replaces the category name; reply items matching an existing item's text
/// add their steps to it, the rest are inserted as `item_type` items.
pub async fn enhance_category(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    owner_id: &str,
    category_id: DbId,
    transcript: &str,
    item_type: &str,
) -> Result<CategoryTree, PipelineError> {
    validate_item_type(item_type)?;
    let transcript = require_text(transcript)?;
    let current = HierarchyRepo::load_category(pool, owner_id, category_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("category", category_id))?;

    let prompt = enhance_category_prompt(&current.to_structure(), transcript);
    let reply = generate_categories(generator, "enhance_category", &prompt).await?;
    let enhanced = first_category(reply)?;

    let summary = HierarchyRepo::merge_into_category(
        pool,
        owner_id,
        category_id,
        Some(&enhanced.name),
        &enhanced.items,
        item_type,
    )
    .await?
    .ok_or_else(|| PipelineError::not_found("category", category_id))?;

    tracing::info!(
        owner_id,
        category_id,
        items = summary.action_items_created,
        steps = summary.next_steps_created,
        "Category enhanced",
    );

    HierarchyRepo::load_category(pool, owner_id, category_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("category", category_id))
}

fn require_text(transcript: &str) -> Result<&str, PipelineError> {
    let trimmed = transcript.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::invalid("Transcript text must not be empty"));
    }
    Ok(trimmed)
}

/// Validated replies always carry at least one category, so these only
/// fail if that invariant is broken upstream.
fn first_category(reply: Vec<StructureCategory>) -> Result<StructureCategory, PipelineError> {
    reply
        .into_iter()
        .next()
        .ok_or_else(|| ValidationError::new("categories", "must not be empty").into())
}

fn first_item(reply: Vec<StructureCategory>) -> Result<StructureItem, PipelineError> {
    first_category(reply)?
        .items
        .into_iter()
        .next()
        .ok_or_else(|| ValidationError::new("categories[0].items", "must not be empty").into())
}
