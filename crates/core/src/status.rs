//! Status and partition constants for the category hierarchy.
//!
//! These must match the CHECK constraints on `categories.status`,
//! `action_items.status`, `action_items.item_type` and `transcripts.source`.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Category status
// ---------------------------------------------------------------------------

pub const CATEGORY_ACTIVE: &str = "active";
pub const CATEGORY_COMPLETED: &str = "completed";

pub const VALID_CATEGORY_STATUSES: &[&str] = &[CATEGORY_ACTIVE, CATEGORY_COMPLETED];

// ---------------------------------------------------------------------------
// Action item status
// ---------------------------------------------------------------------------

pub const ITEM_PENDING: &str = "pending";
pub const ITEM_COMPLETED: &str = "completed";

pub const VALID_ITEM_STATUSES: &[&str] = &[ITEM_PENDING, ITEM_COMPLETED];

// ---------------------------------------------------------------------------
// Action item type (two independent views)
// ---------------------------------------------------------------------------

pub const ITEM_TYPE_REGULAR: &str = "regular";
pub const ITEM_TYPE_DAILY: &str = "daily";

pub const VALID_ITEM_TYPES: &[&str] = &[ITEM_TYPE_REGULAR, ITEM_TYPE_DAILY];

// ---------------------------------------------------------------------------
// Transcript source
// ---------------------------------------------------------------------------

pub const SOURCE_VOICE: &str = "voice";
pub const SOURCE_TEXT: &str = "text";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_one_of(kind: &str, value: &str, valid: &[&str]) -> Result<(), CoreError> {
    if valid.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {kind} '{value}'. Must be one of: {}",
            valid.join(", ")
        )))
    }
}

pub fn validate_category_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("category status", status, VALID_CATEGORY_STATUSES)
}

pub fn validate_item_status(status: &str) -> Result<(), CoreError> {
    validate_one_of("action item status", status, VALID_ITEM_STATUSES)
}

pub fn validate_item_type(item_type: &str) -> Result<(), CoreError> {
    validate_one_of("action item type", item_type, VALID_ITEM_TYPES)
}

/// Map a category status onto the status its action items take when the
/// completion toggle cascades, plus the `completed` flag for next steps.
///
/// The cascade also accepts the item-level `pending` value as a synonym for
/// reopening the category.
pub fn cascade_targets(category_status: &str) -> Result<(&'static str, &'static str, bool), CoreError> {
    match category_status {
        CATEGORY_COMPLETED => Ok((CATEGORY_COMPLETED, ITEM_COMPLETED, true)),
        CATEGORY_ACTIVE | ITEM_PENDING => Ok((CATEGORY_ACTIVE, ITEM_PENDING, false)),
        other => Err(CoreError::Validation(format!(
            "Invalid category status '{other}'. Must be one of: active, completed, pending"
        ))),
    }
}
