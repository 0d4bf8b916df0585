//! Combine several categories into one, optionally named by the model.

use serde::Deserialize;
use sqlx::PgPool;
use taskvox_ai::TextGenerator;
use taskvox_core::combine::{
    parse_suggested_name, resolve_combined_name, validate_category_name, validate_combine_ids,
    CombineMode,
};
use taskvox_core::prompts::combine_name_prompt;
use taskvox_core::types::DbId;
use taskvox_db::models::hierarchy::CategoryTree;
use taskvox_db::repositories::{CategoryRepo, HierarchyRepo};

use crate::error::PipelineError;

/// Body of `POST /categories/combine`.
#[derive(Debug, Clone, Deserialize)]
pub struct CombineRequest {
    pub category_ids: Vec<DbId>,
    /// Only these items are carried over; the rest are deleted with their
    /// source categories. `None` carries over everything.
    #[serde(default)]
    pub item_ids: Option<Vec<DbId>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mode: CombineMode,
}

/// Validate, pick a name, and run the combine transaction.
///
/// In [`CombineMode::Ai`] without a custom name the model suggests one; if
/// that call fails or yields nothing usable the default name is used.
pub async fn combine(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    owner_id: &str,
    request: &CombineRequest,
) -> Result<CategoryTree, PipelineError> {
    let ids = validate_combine_ids(&request.category_ids)?;
    let custom = request
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .map(validate_category_name)
        .transpose()?;

    let sources = CategoryRepo::list_by_ids(pool, owner_id, &ids).await?;
    if let Some(&missing) = ids.iter().find(|id| !sources.iter().any(|c| c.id == **id)) {
        return Err(PipelineError::not_found("category", missing));
    }

    let suggested = match (request.mode, &custom) {
        (CombineMode::Ai, None) => {
            let names: Vec<String> = sources.iter().map(|c| c.name.clone()).collect();
            suggest_name(generator, &names).await
        }
        _ => None,
    };
    let name = resolve_combined_name(custom.as_deref(), suggested);

    let combined = HierarchyRepo::combine_categories(
        pool,
        owner_id,
        &ids,
        request.item_ids.as_deref(),
        &name,
    )
    .await?
    .ok_or_else(|| PipelineError::not_found("category", ids[0]))?;

    HierarchyRepo::load_category(pool, owner_id, combined.id)
        .await?
        .ok_or_else(|| PipelineError::not_found("category", combined.id))
}

async fn suggest_name(generator: &dyn TextGenerator, names: &[String]) -> Option<String> {
    match generator.generate(&combine_name_prompt(names), None).await {
        Ok(reply) => {
            let parsed = parse_suggested_name(&reply);
            if parsed.is_none() {
                tracing::warn!(raw = %reply, "No usable name in AI reply; using default");
            }
            parsed
        }
        Err(e) => {
            tracing::warn!(error = %e, "AI name suggestion failed; using default");
            None
        }
    }
}
