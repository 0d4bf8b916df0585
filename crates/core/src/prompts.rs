//! Prompt builders for the generative-text service.
//!
//! Every prompt that expects structured output spells out the exact JSON
//! shape the structure validator accepts, so the two must change together.

use serde_json::json;

use crate::structure::StructureCategory;

/// JSON shape for `StructureMode::Categories`.
const CATEGORIES_SHAPE: &str = r#"{"categories": [{"name": "Category name", "items": [{"actionItem": "Action to take", "nextSteps": ["First concrete step", "Second concrete step"]}]}]}"#;

/// JSON shape for `StructureMode::Proposal`.
const PROPOSAL_SHAPE: &str = r#"{"proposedStructure": [{"name": "Category name", "items": [{"actionItem": "Action to take", "nextSteps": ["Step"]}]}], "changeSummary": "One or two sentences describing what changed"}"#;

const JSON_ONLY: &str =
    "Respond with JSON only, no commentary and no markdown code fences.";

/// Turn a free-form transcript into categorized action items.
pub fn ingest_prompt(transcript: &str, item_type: &str) -> String {
    let horizon = if item_type == crate::status::ITEM_TYPE_DAILY {
        "These are tasks for today; keep next steps short and immediately actionable."
    } else {
        "These are general to-do items; include next steps that move each item forward."
    };

    format!(
        "You organize spoken notes into a to-do list.\n\
         Group the action items in the transcript below into a small number of meaningful categories. \
         Every category must contain at least one action item. {horizon}\n\n\
         Return exactly this shape:\n{CATEGORIES_SHAPE}\n{JSON_ONLY}\n\n\
         Transcript:\n\"\"\"\n{transcript}\n\"\"\""
    )
}

/// Ask for a complete replacement hierarchy following a user instruction.
pub fn refine_prompt(current: &[StructureCategory], instruction: &str) -> String {
    let current_json =
        serde_json::to_string_pretty(&json!({ "categories": current })).unwrap_or_default();

    format!(
        "You restructure an existing to-do list according to the user's instruction.\n\
         Return the COMPLETE new list, including every item that should remain; anything you \
         leave out will be deleted. Every category must contain at least one action item.\n\n\
         Return exactly this shape:\n{PROPOSAL_SHAPE}\n{JSON_ONLY}\n\n\
         Current list:\n{current_json}\n\n\
         Instruction:\n\"\"\"\n{instruction}\n\"\"\""
    )
}

/// Enhance one action item with new spoken context.
///
/// The reply uses the categories shape with exactly one category holding
/// exactly one item: the (possibly reworded) action item and the next steps
/// to add.
pub fn enhance_item_prompt(
    category_name: &str,
    item_text: &str,
    existing_steps: &[String],
    transcript: &str,
) -> String {
    let existing = if existing_steps.is_empty() {
        "(none)".to_string()
    } else {
        existing_steps
            .iter()
            .map(|s| format!("- {s}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You refine a single to-do item using new spoken notes.\n\
         Rewrite the action item text only if the notes clarify it, and list next steps that the \
         notes add. Do not repeat existing next steps.\n\n\
         Return exactly this shape, with one category named \"{category_name}\" containing one item:\n\
         {CATEGORIES_SHAPE}\n{JSON_ONLY}\n\n\
         Action item: {item_text}\n\
         Existing next steps:\n{existing}\n\n\
         New notes:\n\"\"\"\n{transcript}\n\"\"\""
    )
}

/// Enhance a whole category with new spoken context.
///
/// The reply uses the categories shape with exactly one category: its
/// (possibly reworded) name and the items to add or extend. Items whose
/// text matches an existing item extend that item's next steps.
pub fn enhance_category_prompt(category: &StructureCategory, transcript: &str) -> String {
    let current_json =
        serde_json::to_string_pretty(&json!({ "categories": [category] })).unwrap_or_default();

    format!(
        "You extend an existing to-do category using new spoken notes.\n\
         Keep existing action item text unchanged when adding next steps to it, and add new action \
         items for anything new. Do not repeat existing next steps.\n\n\
         Return exactly this shape, with exactly one category:\n{CATEGORIES_SHAPE}\n{JSON_ONLY}\n\n\
         Current category:\n{current_json}\n\n\
         New notes:\n\"\"\"\n{transcript}\n\"\"\""
    )
}

/// Extract to-do entries from an attached image (handwritten or printed list,
/// whiteboard, screenshot).
pub fn extract_image_prompt() -> String {
    format!(
        "Read the attached image and list every to-do item or task it contains, one entry per task, \
         in reading order.\n\
         Return a JSON array of strings, for example [\"Buy milk\", \"Call the plumber\"]. \
         Return [] if there are none.\n{JSON_ONLY}"
    )
}

/// Extract to-do entries from pasted free text.
pub fn extract_text_prompt(text: &str) -> String {
    format!(
        "List every to-do item or task contained in the text below, one entry per task.\n\
         Return a JSON array of strings, for example [\"Buy milk\", \"Call the plumber\"].\n\
         {JSON_ONLY}\n\n\
         Text:\n\"\"\"\n{text}\n\"\"\""
    )
}

/// Ask for one short name covering several categories.
pub fn combine_name_prompt(names: &[String]) -> String {
    let list = names
        .iter()
        .map(|n| format!("- {n}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "These to-do categories are being merged into one:\n{list}\n\n\
         Suggest a short name (at most four words) for the merged category.\n\
         Respond with JSON only: {{\"name\": \"Suggested name\"}}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::StructureItem;

    #[test]
    fn ingest_prompt_embeds_transcript_and_shape() {
        let prompt = ingest_prompt("call the bank tomorrow", "regular");
        assert!(prompt.contains("call the bank tomorrow"));
        assert!(prompt.contains(r#""actionItem""#));
        assert!(prompt.contains(r#""nextSteps""#));
    }

    #[test]
    fn daily_prompt_mentions_today() {
        assert!(ingest_prompt("x", "daily").contains("today"));
    }

    #[test]
    fn refine_prompt_serializes_current_list() {
        let current = vec![StructureCategory {
            name: "Work".into(),
            items: vec![StructureItem {
                action_item: "Email Bob".into(),
                next_steps: vec![],
            }],
        }];
        let prompt = refine_prompt(&current, "merge everything");
        assert!(prompt.contains("\"Email Bob\""));
        assert!(prompt.contains("proposedStructure"));
        assert!(prompt.contains("merge everything"));
    }

    #[test]
    fn enhance_item_prompt_lists_existing_steps() {
        let prompt = enhance_item_prompt("Work", "Email Bob", &["Draft".into()], "also cc Alice");
        assert!(prompt.contains("- Draft"));
        assert!(prompt.contains("also cc Alice"));

        let empty = enhance_item_prompt("Work", "Email Bob", &[], "x");
        assert!(empty.contains("(none)"));
    }

    #[test]
    fn combine_prompt_lists_names() {
        let prompt = combine_name_prompt(&["Home".into(), "Garden".into()]);
        assert!(prompt.contains("- Home\n- Garden"));
        assert!(prompt.contains(r#"{"name": "Suggested name"}"#));
    }
}
