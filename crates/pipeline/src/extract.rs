//! Extraction: pull a flat list of to-do entries out of an image or pasted
//! text, then (separately, after the user reviews it) save the list into a
//! named category.

use sqlx::PgPool;
use taskvox_ai::{ImageInput, TextGenerator};
use taskvox_core::combine::validate_category_name;
use taskvox_core::prompts::{extract_image_prompt, extract_text_prompt};
use taskvox_core::status::validate_item_type;
use taskvox_db::models::category::Category;
use taskvox_db::models::hierarchy::ApplySummary;
use taskvox_db::repositories::HierarchyRepo;

use crate::error::PipelineError;
use crate::structured::generate_flat_list;

/// Image MIME types accepted for extraction.
pub const SUPPORTED_IMAGE_TYPES: &[&str] =
    &["image/png", "image/jpeg", "image/webp", "image/heic", "image/heif"];

/// Read to-do entries from an image. Nothing is written.
pub async fn extract_from_image(
    generator: &dyn TextGenerator,
    image: ImageInput,
) -> Result<Vec<String>, PipelineError> {
    if image.bytes.is_empty() {
        return Err(PipelineError::invalid("Image upload is empty"));
    }
    if !SUPPORTED_IMAGE_TYPES.contains(&image.mime_type.as_str()) {
        return Err(PipelineError::invalid(format!(
            "Unsupported image type '{}'. Must be one of: {}",
            image.mime_type,
            SUPPORTED_IMAGE_TYPES.join(", ")
        )));
    }

    generate_flat_list(generator, "extract_image", &extract_image_prompt(), Some(image)).await
}

/// Read to-do entries from pasted text. Nothing is written.
pub async fn extract_from_text(
    generator: &dyn TextGenerator,
    text: &str,
) -> Result<Vec<String>, PipelineError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(PipelineError::invalid("Text must not be empty"));
    }

    generate_flat_list(generator, "extract_text", &extract_text_prompt(text), None).await
}

/// Append reviewed entries to the category named `category_name`, creating
/// it if the owner has none by that name (case-insensitive).
pub async fn save_extraction(
    pool: &PgPool,
    owner_id: &str,
    category_name: &str,
    entries: &[String],
    item_type: &str,
) -> Result<(Category, ApplySummary), PipelineError> {
    validate_item_type(item_type)?;
    let name = validate_category_name(category_name)?;

    let entries: Vec<String> = entries
        .iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect();
    if entries.is_empty() {
        return Err(PipelineError::invalid("At least one non-empty entry is required"));
    }

    Ok(HierarchyRepo::append_to_named_category(pool, owner_id, &name, &entries, item_type, None)
        .await?)
}
