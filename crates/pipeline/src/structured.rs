//! One model call turned into validated, typed data.

use taskvox_ai::{AiError, ImageInput, TextGenerator};
use taskvox_core::error::CoreError;
use taskvox_core::normalize::normalize_ai_response;
use taskvox_core::structure::{
    validate_structure, ProposedStructure, StructureCategory, StructureMode, ValidatedStructure,
};

use crate::error::PipelineError;

/// Call the model, normalize the reply and validate it against `mode`.
///
/// A blank reply means the service answered with nothing usable, so it goes
/// through the normalizer like any other reply and fails as a parse error.
/// On a parse or validation failure the raw reply is logged at `warn` and
/// the error returned; nothing has been written at that point.
pub(crate) async fn generate_validated(
    generator: &dyn TextGenerator,
    flow: &'static str,
    prompt: &str,
    image: Option<ImageInput>,
    mode: StructureMode,
) -> Result<ValidatedStructure, PipelineError> {
    let raw = match generator.generate(prompt, image).await {
        Ok(raw) => raw,
        Err(AiError::EmptyResponse) => String::new(),
        Err(e) => return Err(e.into()),
    };

    let value = normalize_ai_response(&raw).map_err(|e| {
        tracing::warn!(flow, error = %e.message, raw = %e.raw, "Unparseable AI response");
        e
    })?;

    validate_structure(&value, mode).map_err(|e| {
        tracing::warn!(flow, error = %e, raw = %raw, "AI response failed validation");
        PipelineError::Validation(e)
    })
}

/// `{"categories": [...]}` where every category carries at least one item.
pub(crate) async fn generate_categories(
    generator: &dyn TextGenerator,
    flow: &'static str,
    prompt: &str,
) -> Result<Vec<StructureCategory>, PipelineError> {
    generate_validated(
        generator,
        flow,
        prompt,
        None,
        StructureMode::Categories { allow_empty_items: false },
    )
    .await?
    .into_categories()
    .ok_or_else(|| mode_mismatch(flow))
}

pub(crate) async fn generate_flat_list(
    generator: &dyn TextGenerator,
    flow: &'static str,
    prompt: &str,
    image: Option<ImageInput>,
) -> Result<Vec<String>, PipelineError> {
    generate_validated(generator, flow, prompt, image, StructureMode::FlatList)
        .await?
        .into_flat_list()
        .ok_or_else(|| mode_mismatch(flow))
}

pub(crate) async fn generate_proposal(
    generator: &dyn TextGenerator,
    flow: &'static str,
    prompt: &str,
) -> Result<ProposedStructure, PipelineError> {
    generate_validated(generator, flow, prompt, None, StructureMode::Proposal)
        .await?
        .into_proposal()
        .ok_or_else(|| mode_mismatch(flow))
}

fn mode_mismatch(flow: &str) -> PipelineError {
    PipelineError::Core(CoreError::Internal(format!(
        "validator returned the wrong shape for {flow}"
    )))
}
