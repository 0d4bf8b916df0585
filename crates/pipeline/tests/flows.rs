//! Integration tests for the AI-backed flows, with a scripted model in place
//! of the real service.

use std::collections::VecDeque;
use std::sync::Mutex;

use assert_matches::assert_matches;
use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use taskvox_ai::{AiError, ImageInput, SpeechToText, TextGenerator};
use taskvox_core::combine::{CombineMode, DEFAULT_COMBINED_NAME};
use taskvox_core::error::CoreError;
use taskvox_core::status::{ITEM_TYPE_DAILY, ITEM_TYPE_REGULAR};
use taskvox_db::repositories::{CategoryRepo, HierarchyRepo, TranscriptRepo};
use taskvox_pipeline::combine::{combine, CombineRequest};
use taskvox_pipeline::enhance::{enhance_category, enhance_item};
use taskvox_pipeline::extract::{extract_from_image, extract_from_text, save_extraction};
use taskvox_pipeline::ingest::{ingest_audio, ingest_text, AudioUpload};
use taskvox_pipeline::refine::{accept_refine, propose_refine};
use taskvox_pipeline::PipelineError;

const OWNER: &str = "user-a";
const OTHER: &str = "user-b";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// Replays canned replies in order; fails with `EmptyResponse` when drained.
struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(AiError::Api {
                status: 503,
                body: "overloaded".into(),
            })])),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _image: Option<ImageInput>) -> Result<String, AiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AiError::EmptyResponse))
    }
}

struct FixedTranscriber(&'static str);

#[async_trait]
impl SpeechToText for FixedTranscriber {
    async fn transcribe(&self, _audio: Vec<u8>, _f: &str, _m: &str) -> Result<String, AiError> {
        Ok(self.0.to_string())
    }
}

const WORK_REPLY: &str = r#"Here you go:
```json
{"categories": [{"name": "Work", "items": [{"actionItem": "Email Bob", "nextSteps": ["Draft", "Send"]}]}]}
```"#;

async fn category_count(pool: &PgPool, owner: &str) -> usize {
    CategoryRepo::list(pool, owner).await.unwrap().len()
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_fenced_reply_creates_one_of_each(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[WORK_REPLY]);

    let outcome = ingest_text(&pool, &ai, OWNER, "email bob about the draft", ITEM_TYPE_REGULAR)
        .await
        .unwrap();

    assert_eq!(outcome.summary.categories_created, 1);
    assert_eq!(outcome.summary.action_items_created, 1);
    assert_eq!(outcome.summary.next_steps_created, 2);
    assert_eq!(outcome.categories.len(), 1);
    assert_eq!(
        outcome.categories[0].items[0].item.source_transcript_id,
        Some(outcome.transcript.id)
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_unparseable_reply_writes_nothing(pool: PgPool) {
    let ai = ScriptedGenerator::new(&["Sorry, I can't help with that."]);

    let result = ingest_text(&pool, &ai, OWNER, "anything", ITEM_TYPE_REGULAR).await;
    assert_matches!(result, Err(PipelineError::Parse(_)));

    assert_eq!(category_count(&pool, OWNER).await, 0);
    assert!(TranscriptRepo::list(&pool, OWNER, None, None).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_invalid_shape_writes_nothing(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[r#"{"categories": [{"name": "Work", "items": []}]}"#]);

    let result = ingest_text(&pool, &ai, OWNER, "anything", ITEM_TYPE_REGULAR).await;
    assert_matches!(result, Err(PipelineError::Validation(e)) if e.path == "categories[0].items");
    assert_eq!(category_count(&pool, OWNER).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_ai_failure_surfaces_as_ai_error(pool: PgPool) {
    let ai = ScriptedGenerator::failing();
    let result = ingest_text(&pool, &ai, OWNER, "anything", ITEM_TYPE_REGULAR).await;
    assert_matches!(result, Err(PipelineError::Ai(AiError::Api { status: 503, .. })));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_empty_reply_is_a_parse_failure(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[]);

    let result = ingest_text(&pool, &ai, OWNER, "anything", ITEM_TYPE_REGULAR).await;
    assert_matches!(result, Err(PipelineError::Parse(_)));
    assert!(TranscriptRepo::list(&pool, OWNER, None, None).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_failed_append_leaves_no_transcript(pool: PgPool) {
    sqlx::raw_sql(
        "CREATE FUNCTION reject_action_item() RETURNS trigger AS $$ \
         BEGIN RAISE EXCEPTION 'action item insert rejected'; END; \
         $$ LANGUAGE plpgsql; \
         CREATE TRIGGER reject_action_item BEFORE INSERT ON action_items \
             FOR EACH ROW EXECUTE FUNCTION reject_action_item();",
    )
    .execute(&pool)
    .await
    .unwrap();
    let ai = ScriptedGenerator::new(&[WORK_REPLY, WORK_REPLY]);

    for _ in 0..2 {
        let result = ingest_text(&pool, &ai, OWNER, "email bob", ITEM_TYPE_REGULAR).await;
        assert_matches!(result, Err(PipelineError::Database(_)));
    }

    assert!(TranscriptRepo::list(&pool, OWNER, None, None).await.unwrap().is_empty());
    assert_eq!(category_count(&pool, OWNER).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_blank_text_skips_model(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[WORK_REPLY]);
    let result = ingest_text(&pool, &ai, OWNER, "   ", ITEM_TYPE_REGULAR).await;
    assert_matches!(result, Err(PipelineError::Core(CoreError::Validation(_))));
    assert_eq!(ai.calls(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_audio_records_voice_transcript(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[WORK_REPLY]);
    let stt = FixedTranscriber("email bob");

    let outcome = ingest_audio(
        &pool,
        &stt,
        &ai,
        OWNER,
        AudioUpload {
            bytes: vec![1, 2, 3],
            filename: "note.webm".into(),
            mime_type: "audio/webm".into(),
        },
        ITEM_TYPE_DAILY,
    )
    .await
    .unwrap();

    assert_eq!(outcome.transcript.source, "voice");
    assert_eq!(outcome.transcript.text, "email bob");
    assert_eq!(outcome.categories[0].items[0].item.item_type, ITEM_TYPE_DAILY);
}

// ---------------------------------------------------------------------------
// Refine
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_propose_does_not_write_and_accept_replaces(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[WORK_REPLY]);
    ingest_text(&pool, &ai, OWNER, "email bob", ITEM_TYPE_REGULAR).await.unwrap();

    let proposal_reply = r#"{"proposedStructure": [
        {"name": "Comms", "items": [{"actionItem": "Email Bob", "nextSteps": ["Send"]}]},
        {"name": "Admin", "items": [{"actionItem": "File taxes"}]}
    ], "changeSummary": "Split into two categories."}"#;
    let ai = ScriptedGenerator::new(&[proposal_reply]);

    let proposal = propose_refine(&pool, &ai, OWNER, "split it up").await.unwrap();
    assert_eq!(proposal.proposed_structure.len(), 2);
    assert_eq!(proposal.change_summary, "Split into two categories.");
    assert_eq!(category_count(&pool, OWNER).await, 1);

    let sent_back = serde_json::to_value(&proposal.proposed_structure).unwrap();
    let (summary, trees) = accept_refine(&pool, OWNER, &sent_back).await.unwrap();
    assert_eq!(summary.categories_created, 2);
    let names: Vec<_> = trees.iter().map(|t| t.category.name.as_str()).collect();
    assert_eq!(names, vec!["Comms", "Admin"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_accept_rejects_invalid_proposal_without_writing(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[WORK_REPLY]);
    ingest_text(&pool, &ai, OWNER, "email bob", ITEM_TYPE_REGULAR).await.unwrap();

    let bad = json!([{ "name": "Empty", "items": [] }]);
    let result = accept_refine(&pool, OWNER, &bad).await;
    assert_matches!(result, Err(PipelineError::Validation(_)));

    let trees = HierarchyRepo::load(&pool, OWNER, None).await.unwrap();
    assert_eq!(trees[0].category.name, "Work");
}

// ---------------------------------------------------------------------------
// Enhance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enhance_item_adds_new_steps_only(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[WORK_REPLY]);
    let outcome = ingest_text(&pool, &ai, OWNER, "email bob", ITEM_TYPE_REGULAR).await.unwrap();
    let item_id = outcome.categories[0].items[0].item.id;

    let ai = ScriptedGenerator::new(&[
        r#"{"categories": [{"name": "Work", "items": [{"actionItem": "Email Bob the budget", "nextSteps": ["send", "Attach budget"]}]}]}"#,
    ]);
    let tree = enhance_item(&pool, &ai, OWNER, item_id, "attach the budget").await.unwrap();

    let item = &tree.items[0];
    assert_eq!(item.item.text, "Email Bob the budget");
    let steps: Vec<_> = item.next_steps.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(steps, vec!["Draft", "Send", "Attach budget"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enhance_foreign_item_is_not_found(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[WORK_REPLY]);
    let outcome = ingest_text(&pool, &ai, OWNER, "email bob", ITEM_TYPE_REGULAR).await.unwrap();
    let item_id = outcome.categories[0].items[0].item.id;

    let ai = ScriptedGenerator::new(&[WORK_REPLY]);
    let result = enhance_item(&pool, &ai, OTHER, item_id, "steal").await;
    assert_matches!(result, Err(PipelineError::Core(CoreError::NotFound { .. })));
    assert_eq!(ai.calls(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enhance_category_merges_and_inserts(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[WORK_REPLY]);
    let outcome = ingest_text(&pool, &ai, OWNER, "email bob", ITEM_TYPE_REGULAR).await.unwrap();
    let category_id = outcome.categories[0].category.id;

    let ai = ScriptedGenerator::new(&[
        r#"{"categories": [{"name": "Work stuff", "items": [
            {"actionItem": "email bob", "nextSteps": ["Follow up"]},
            {"actionItem": "Book room", "nextSteps": []}
        ]}]}"#,
    ]);
    let tree = enhance_category(&pool, &ai, OWNER, category_id, "more notes", ITEM_TYPE_REGULAR)
        .await
        .unwrap();

    assert_eq!(tree.category.name, "Work stuff");
    assert_eq!(tree.items.len(), 2);
    assert_eq!(tree.items[0].next_steps.len(), 3);
    assert_eq!(tree.items[1].item.text, "Book room");
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_extract_then_save_appends_to_named_category(pool: PgPool) {
    let ai = ScriptedGenerator::new(&[r#"["Buy milk", "Call plumber"]"#]);
    let entries = extract_from_image(
        &ai,
        ImageInput {
            bytes: vec![0x89, 0x50],
            mime_type: "image/png".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(entries, vec!["Buy milk", "Call plumber"]);
    assert_eq!(category_count(&pool, OWNER).await, 0);

    let (category, summary) =
        save_extraction(&pool, OWNER, "Errands", &entries, ITEM_TYPE_REGULAR).await.unwrap();
    assert_eq!(summary.action_items_created, 2);

    let (again, _) = save_extraction(&pool, OWNER, "errands", &["Post letter".into()], ITEM_TYPE_REGULAR)
        .await
        .unwrap();
    assert_eq!(again.id, category.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_extract_rejects_unsupported_image_type(_pool: PgPool) {
    let ai = ScriptedGenerator::new(&["[]"]);
    let result = extract_from_image(
        &ai,
        ImageInput {
            bytes: vec![1],
            mime_type: "application/pdf".into(),
        },
    )
    .await;
    assert_matches!(result, Err(PipelineError::Core(CoreError::Validation(_))));
    assert_eq!(ai.calls(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_extract_text_rejects_object_reply(_pool: PgPool) {
    let ai = ScriptedGenerator::new(&[r#"{"items": ["a"]}"#]);
    let result = extract_from_text(&ai, "a, b and c").await;
    assert_matches!(result, Err(PipelineError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Combine
// ---------------------------------------------------------------------------

async fn two_categories(pool: &PgPool) -> Vec<i64> {
    let a = CategoryRepo::create(pool, OWNER, "Work").await.unwrap();
    let b = CategoryRepo::create(pool, OWNER, "Office").await.unwrap();
    vec![a.id, b.id]
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_combine_simple_uses_default_name(pool: PgPool) {
    let ids = two_categories(&pool).await;
    let ai = ScriptedGenerator::new(&[]);

    let tree = combine(
        &pool,
        &ai,
        OWNER,
        &CombineRequest {
            category_ids: ids,
            item_ids: None,
            name: None,
            mode: CombineMode::Simple,
        },
    )
    .await
    .unwrap();

    assert_eq!(tree.category.name, DEFAULT_COMBINED_NAME);
    assert_eq!(category_count(&pool, OWNER).await, 1);
    assert_eq!(ai.calls(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_combine_ai_uses_suggested_name(pool: PgPool) {
    let ids = two_categories(&pool).await;
    let ai = ScriptedGenerator::new(&[r#"{"name": "Job"}"#]);

    let tree = combine(
        &pool,
        &ai,
        OWNER,
        &CombineRequest {
            category_ids: ids,
            item_ids: None,
            name: None,
            mode: CombineMode::Ai,
        },
    )
    .await
    .unwrap();
    assert_eq!(tree.category.name, "Job");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_combine_ai_failure_falls_back_to_default(pool: PgPool) {
    let ids = two_categories(&pool).await;
    let ai = ScriptedGenerator::failing();

    let tree = combine(
        &pool,
        &ai,
        OWNER,
        &CombineRequest {
            category_ids: ids,
            item_ids: None,
            name: None,
            mode: CombineMode::Ai,
        },
    )
    .await
    .unwrap();
    assert_eq!(tree.category.name, DEFAULT_COMBINED_NAME);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_combine_preconditions(pool: PgPool) {
    let ids = two_categories(&pool).await;
    let theirs = CategoryRepo::create(&pool, OTHER, "Theirs").await.unwrap();
    let ai = ScriptedGenerator::new(&[]);

    let single = CombineRequest {
        category_ids: vec![ids[0], ids[0]],
        item_ids: None,
        name: None,
        mode: CombineMode::Simple,
    };
    assert_matches!(
        combine(&pool, &ai, OWNER, &single).await,
        Err(PipelineError::Core(CoreError::Validation(_)))
    );

    let foreign = CombineRequest {
        category_ids: vec![ids[0], theirs.id],
        ..single
    };
    assert_matches!(
        combine(&pool, &ai, OWNER, &foreign).await,
        Err(PipelineError::Core(CoreError::NotFound { id, .. })) if id == theirs.id
    );
    assert_eq!(category_count(&pool, OWNER).await, 2);
}
