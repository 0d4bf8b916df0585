//! Structure validator for AI-authored category hierarchies.
//!
//! The normalizer only guarantees "some JSON". Nothing reaches the upsert
//! engine until it has passed through [`validate_structure`], which checks
//! the minimum shape contract and returns typed, trimmed values with
//! defaults filled in.
//!
//! Accepted shapes:
//!
//! ```text
//! Categories  {"categories": [{"name": "...", "items": [{"actionItem": "...", "nextSteps": ["..."]}]}]}
//! FlatList    ["...", "..."]
//! Proposal    {"proposedStructure": [<category>...], "changeSummary": "..."}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Validated types
// ---------------------------------------------------------------------------

/// One action item with the text of its next steps.
///
/// Serializes to the exact shape used by the AI prompts and outbound mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureItem {
    #[serde(rename = "actionItem")]
    pub action_item: String,
    #[serde(rename = "nextSteps", default)]
    pub next_steps: Vec<String>,
}

/// One category with its action items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureCategory {
    pub name: String,
    pub items: Vec<StructureItem>,
}

/// A refine proposal: a complete replacement hierarchy and a human summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedStructure {
    pub proposed_structure: Vec<StructureCategory>,
    pub change_summary: String,
}

/// Expected top-level shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureMode {
    /// `{"categories": [...]}`. Extraction flows accept categories with zero
    /// items; AI-authoring flows do not.
    Categories { allow_empty_items: bool },
    /// A bare array of strings.
    FlatList,
    /// `{"proposedStructure": [...], "changeSummary": "..."}`.
    Proposal,
}

/// Output of [`validate_structure`], one variant per [`StructureMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedStructure {
    Categories(Vec<StructureCategory>),
    FlatList(Vec<String>),
    Proposal(ProposedStructure),
}

impl ValidatedStructure {
    pub fn into_categories(self) -> Option<Vec<StructureCategory>> {
        match self {
            Self::Categories(categories) => Some(categories),
            _ => None,
        }
    }

    pub fn into_flat_list(self) -> Option<Vec<String>> {
        match self {
            Self::FlatList(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn into_proposal(self) -> Option<ProposedStructure> {
        match self {
            Self::Proposal(proposal) => Some(proposal),
            _ => None,
        }
    }
}

/// The first offending path and what is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path} {reason}")]
pub struct ValidationError {
    pub path: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate a normalized value against the given mode.
pub fn validate_structure(
    value: &Value,
    mode: StructureMode,
) -> Result<ValidatedStructure, ValidationError> {
    match mode {
        StructureMode::Categories { allow_empty_items } => {
            validate_categories(value, allow_empty_items).map(ValidatedStructure::Categories)
        }
        StructureMode::FlatList => validate_flat_list(value).map(ValidatedStructure::FlatList),
        StructureMode::Proposal => validate_proposal(value).map(ValidatedStructure::Proposal),
    }
}

/// Validate `{"categories": [...]}`.
pub fn validate_categories(
    value: &Value,
    allow_empty_items: bool,
) -> Result<Vec<StructureCategory>, ValidationError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ValidationError::new("$", "must be an object"))?;
    let categories = require_array(obj, "categories", "categories")?;
    validate_category_array(categories, "categories", allow_empty_items)
}

/// Validate `["...", ...]`.
pub fn validate_flat_list(value: &Value) -> Result<Vec<String>, ValidationError> {
    let entries = value
        .as_array()
        .ok_or_else(|| ValidationError::new("$", "must be an array"))?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| non_empty_string(Some(entry), &format!("[{i}]")))
        .collect()
}

/// Validate `{"proposedStructure": [...], "changeSummary": "..."}`.
///
/// Categories inside a proposal must each carry at least one item.
pub fn validate_proposal(value: &Value) -> Result<ProposedStructure, ValidationError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ValidationError::new("$", "must be an object"))?;
    let categories = require_array(obj, "proposedStructure", "proposedStructure")?;
    let proposed_structure = validate_category_array(categories, "proposedStructure", false)?;

    let change_summary = match obj.get("changeSummary") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(_) => return Err(ValidationError::new("changeSummary", "must be a string")),
        None => return Err(ValidationError::new("changeSummary", "missing")),
    };

    Ok(ProposedStructure {
        proposed_structure,
        change_summary,
    })
}

/// Validate an array of category objects found at `path`.
///
/// Used directly when a client hands back a proposal it previously received.
pub fn validate_category_array(
    categories: &[Value],
    path: &str,
    allow_empty_items: bool,
) -> Result<Vec<StructureCategory>, ValidationError> {
    if categories.is_empty() {
        return Err(ValidationError::new(path, "must not be empty"));
    }

    categories
        .iter()
        .enumerate()
        .map(|(ci, category)| {
            validate_category(category, &format!("{path}[{ci}]"), allow_empty_items)
        })
        .collect()
}

/// Case- and whitespace-insensitive key used when matching existing text.
pub fn match_key(text: &str) -> String {
    text.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_category(
    value: &Value,
    path: &str,
    allow_empty_items: bool,
) -> Result<StructureCategory, ValidationError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ValidationError::new(path, "must be an object"))?;

    let name = non_empty_string(obj.get("name"), &format!("{path}.name"))?;

    let items_path = format!("{path}.items");
    let items = require_array(obj, "items", &items_path)?;
    if items.is_empty() && !allow_empty_items {
        return Err(ValidationError::new(items_path, "must not be empty"));
    }

    let items = items
        .iter()
        .enumerate()
        .map(|(ii, item)| validate_item(item, &format!("{items_path}[{ii}]")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StructureCategory { name, items })
}

fn validate_item(value: &Value, path: &str) -> Result<StructureItem, ValidationError> {
    let obj = value
        .as_object()
        .ok_or_else(|| ValidationError::new(path, "must be an object"))?;

    let action_item = non_empty_string(obj.get("actionItem"), &format!("{path}.actionItem"))?;

    let steps_path = format!("{path}.nextSteps");
    let next_steps = match obj.get("nextSteps") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(steps)) => {
            let mut out = Vec::with_capacity(steps.len());
            for (si, step) in steps.iter().enumerate() {
                match step {
                    Value::String(s) if !s.trim().is_empty() => out.push(s.trim().to_string()),
                    Value::String(_) => {}
                    _ => {
                        return Err(ValidationError::new(
                            format!("{steps_path}[{si}]"),
                            "must be a string",
                        ))
                    }
                }
            }
            out
        }
        Some(_) => return Err(ValidationError::new(steps_path, "must be an array")),
    };

    Ok(StructureItem {
        action_item,
        next_steps,
    })
}

fn require_array<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a Vec<Value>, ValidationError> {
    match obj.get(key) {
        Some(Value::Array(arr)) => Ok(arr),
        Some(_) => Err(ValidationError::new(path, "must be an array")),
        None => Err(ValidationError::new(path, "missing")),
    }
}

fn non_empty_string(value: Option<&Value>, path: &str) -> Result<String, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::new(path, "missing")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ValidationError::new(path, "must not be empty"))
        }
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(ValidationError::new(path, "must be a string")),
    }
}
