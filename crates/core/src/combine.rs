//! Category combine: request validation and name selection.
//!
//! The combined category's name comes from, in order of preference: the
//! caller's custom name, a name suggested by the generative model from the
//! source category names, or [`DEFAULT_COMBINED_NAME`].

use serde::Deserialize;

use crate::error::CoreError;
use crate::normalize::normalize_ai_response;
use crate::types::DbId;

/// Fallback name when neither a custom nor a suggested name is usable.
pub const DEFAULT_COMBINED_NAME: &str = "Combined Category";

/// Minimum number of distinct source categories.
pub const MIN_COMBINE_CATEGORIES: usize = 2;

/// Longest accepted category name, in characters.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 200;

/// How the combined category is named when no custom name is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    /// Use the default name.
    #[default]
    Simple,
    /// Ask the generative model for a name.
    Ai,
}

/// De-duplicate the source ids (keeping first occurrence) and require at
/// least [`MIN_COMBINE_CATEGORIES`] of them.
pub fn validate_combine_ids(ids: &[DbId]) -> Result<Vec<DbId>, CoreError> {
    let mut unique = Vec::with_capacity(ids.len());
    for &id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }

    if unique.len() < MIN_COMBINE_CATEGORIES {
        return Err(CoreError::Validation(format!(
            "Combining requires at least {MIN_COMBINE_CATEGORIES} distinct categories (got {})",
            unique.len()
        )));
    }
    Ok(unique)
}

/// Validate a user-supplied category name and return it trimmed.
pub fn validate_category_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Category name must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Category name exceeds maximum length of {MAX_CATEGORY_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Extract a category name from a model reply.
///
/// Accepts `{"name": "..."}` JSON or plain text, in which case the first
/// non-empty line is used with surrounding quotes, markdown emphasis and a
/// leading `Name:` label removed. Returns `None` when nothing usable is left.
pub fn parse_suggested_name(reply: &str) -> Option<String> {
    if let Ok(value) = normalize_ai_response(reply) {
        if let Some(name) = value.get("name").and_then(|v| v.as_str()) {
            return clean_name(name);
        }
    }

    let line = reply
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with("```"))?;
    clean_name(line)
}

/// Pick the combined category's name.
pub fn resolve_combined_name(custom: Option<&str>, suggested: Option<String>) -> String {
    custom
        .and_then(clean_name)
        .or(suggested)
        .unwrap_or_else(|| DEFAULT_COMBINED_NAME.to_string())
}

fn clean_name(raw: &str) -> Option<String> {
    let mut name = raw.trim();
    for prefix in ["Name:", "name:", "Category:", "category:"] {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest.trim();
        }
    }
    let name = name
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '*' || c == '`')
        .trim();

    if name.is_empty() || name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        None
    } else {
        Some(name.to_string())
    }
}
