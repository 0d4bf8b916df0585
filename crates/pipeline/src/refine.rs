//! Refine: the model proposes a complete replacement hierarchy, the user
//! reviews it, and accepting it runs a Full Replace.

use serde_json::Value;
use sqlx::PgPool;
use taskvox_ai::TextGenerator;
use taskvox_core::prompts::refine_prompt;
use taskvox_core::structure::{validate_category_array, ProposedStructure, ValidationError};
use taskvox_db::models::hierarchy::{ApplySummary, CategoryTree};
use taskvox_db::repositories::HierarchyRepo;

use crate::error::PipelineError;
use crate::structured::generate_proposal;

/// Ask the model for a restructured hierarchy. Nothing is written.
pub async fn propose_refine(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    owner_id: &str,
    instruction: &str,
) -> Result<ProposedStructure, PipelineError> {
    let instruction = instruction.trim();
    if instruction.is_empty() {
        return Err(PipelineError::invalid("Refine instruction must not be empty"));
    }

    let current: Vec<_> = HierarchyRepo::load(pool, owner_id, None)
        .await?
        .iter()
        .map(CategoryTree::to_structure)
        .collect();

    let proposal =
        generate_proposal(generator, "refine", &refine_prompt(&current, instruction)).await?;

    tracing::info!(
        owner_id,
        categories = proposal.proposed_structure.len(),
        "Refine proposal generated",
    );
    Ok(proposal)
}

/// Replace the owner's hierarchy with a proposal sent back by the client.
///
/// `proposed` is the `proposedStructure` array as received; it is validated
/// again because it has round-tripped through the client.
pub async fn accept_refine(
    pool: &PgPool,
    owner_id: &str,
    proposed: &Value,
) -> Result<(ApplySummary, Vec<CategoryTree>), PipelineError> {
    let entries = proposed
        .as_array()
        .ok_or_else(|| ValidationError::new("proposedStructure", "must be an array"))?;
    let categories = validate_category_array(entries, "proposedStructure", false)?;

    let summary = HierarchyRepo::replace_all(pool, owner_id, &categories).await?;
    let trees = HierarchyRepo::load(pool, owner_id, None).await?;
    Ok((summary, trees))
}
