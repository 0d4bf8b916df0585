//! HTTP-level tests for the AI-backed endpoints, with a scripted model.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get_as, post_json, post_multipart, ScriptedGenerator, OWNER,
};
use serde_json::json;
use sqlx::PgPool;

const WORK_REPLY: &str = r#"```json
{"categories": [{"name": "Work", "items": [{"actionItem": "Email Bob", "nextSteps": ["Draft", "Send"]}]}]}
```"#;

async fn category_names(pool: &PgPool) -> Vec<String> {
    let json = body_json(get_as(common::build_test_app(pool.clone()), OWNER, "/api/v1/categories").await).await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_text_appends_structure(pool: PgPool) {
    let app = common::build_test_app_with(pool.clone(), ScriptedGenerator::new(&[WORK_REPLY]));
    let response = post_json(
        app,
        OWNER,
        "/api/v1/transcripts",
        json!({"text": "I need to email Bob, draft it then send it"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["transcript"]["source"], "text");
    assert_eq!(json["data"]["summary"]["categories_created"], 1);
    assert_eq!(json["data"]["summary"]["action_items_created"], 1);
    assert_eq!(json["data"]["summary"]["next_steps_created"], 2);
    assert_eq!(json["data"]["categories"][0]["items"][0]["text"], "Email Bob");

    let history = body_json(get_as(common::build_test_app(pool), OWNER, "/api/v1/transcripts").await).await;
    assert_eq!(history["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_audio_transcribes_then_ingests(pool: PgPool) {
    let app = common::build_test_app_with(pool.clone(), ScriptedGenerator::new(&[WORK_REPLY]));
    let response = post_multipart(
        app,
        OWNER,
        "/api/v1/transcripts/audio",
        ("memo.webm", "audio/webm", &b"fake-audio-bytes"[..]),
        &[("item_type", "daily")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["transcript"]["source"], "voice");
    assert_eq!(json["data"]["transcript"]["text"], "Email Bob about the report");
    assert_eq!(json["data"]["categories"][0]["items"][0]["item_type"], "daily");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_unparseable_reply_is_502_and_writes_nothing(pool: PgPool) {
    let app = common::build_test_app_with(
        pool.clone(),
        ScriptedGenerator::new(&["I'm sorry, I can't do that."]),
    );
    let response = post_json(app, OWNER, "/api/v1/transcripts", json!({"text": "email Bob"})).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "AI_RESPONSE_UNPARSEABLE");
    assert!(category_names(&pool).await.is_empty());

    let history = body_json(get_as(common::build_test_app(pool), OWNER, "/api/v1/transcripts").await).await;
    assert!(history["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_invalid_shape_is_422(pool: PgPool) {
    let app = common::build_test_app_with(
        pool.clone(),
        ScriptedGenerator::new(&[r#"{"categories": [{"name": "", "items": []}]}"#]),
    );
    let response = post_json(app, OWNER, "/api/v1/transcripts", json!({"text": "email Bob"})).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "INVALID_STRUCTURE");
    assert!(category_names(&pool).await.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_ai_outage_is_503(pool: PgPool) {
    let app = common::build_test_app_with(pool, ScriptedGenerator::failing());
    let response = post_json(app, OWNER, "/api/v1/transcripts", json!({"text": "email Bob"})).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "AI_UNAVAILABLE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ingest_empty_reply_is_502(pool: PgPool) {
    let app = common::build_test_app_with(pool.clone(), ScriptedGenerator::new(&[]));
    let response = post_json(app, OWNER, "/api/v1/transcripts", json!({"text": "email Bob"})).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "AI_RESPONSE_UNPARSEABLE");
    assert!(category_names(&pool).await.is_empty());
}

// ---------------------------------------------------------------------------
// Refine
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refine_propose_then_accept_replaces(pool: PgPool) {
    let proposal = r#"{"proposedStructure": [
        {"name": "Errands", "items": [{"actionItem": "Buy milk", "nextSteps": []}]},
        {"name": "Calls", "items": [{"actionItem": "Call mom", "nextSteps": ["Pick a time"]}]}
    ], "changeSummary": "Split into errands and calls"}"#;

    let app = common::build_test_app_with(
        pool.clone(),
        ScriptedGenerator::new(&[WORK_REPLY, proposal]),
    );
    post_json(app.clone(), OWNER, "/api/v1/transcripts", json!({"text": "email Bob"})).await;

    let response = post_json(
        app,
        OWNER,
        "/api/v1/refine/propose",
        json!({"instruction": "split into errands and calls"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let proposed = body_json(response).await;
    assert_eq!(proposed["data"]["changeSummary"], "Split into errands and calls");
    assert_eq!(category_names(&pool).await, vec!["Work".to_string()]);

    let response = post_json(
        common::build_test_app(pool.clone()),
        OWNER,
        "/api/v1/refine/accept",
        json!({"proposedStructure": proposed["data"]["proposedStructure"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let accepted = body_json(response).await;
    assert_eq!(accepted["data"]["summary"]["categories_created"], 2);

    assert_eq!(
        category_names(&pool).await,
        vec!["Errands".to_string(), "Calls".to_string()]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refine_accept_invalid_proposal_keeps_hierarchy(pool: PgPool) {
    let app = common::build_test_app_with(pool.clone(), ScriptedGenerator::new(&[WORK_REPLY]));
    post_json(app, OWNER, "/api/v1/transcripts", json!({"text": "email Bob"})).await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        OWNER,
        "/api/v1/refine/accept",
        json!({"proposedStructure": [{"name": "Broken", "items": [{"actionItem": 7}]}]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(category_names(&pool).await, vec!["Work".to_string()]);
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_extract_text_then_save(pool: PgPool) {
    let app = common::build_test_app_with(
        pool.clone(),
        ScriptedGenerator::new(&[r#"["Buy milk", "  ", "Call mom"]"#]),
    );
    let response = post_json(
        app,
        OWNER,
        "/api/v1/extract/text",
        json!({"text": "milk\ncall mom"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let entries = body_json(response).await["data"]["entries"].clone();
    assert_eq!(entries, json!(["Buy milk", "Call mom"]));

    let response = post_json(
        common::build_test_app(pool.clone()),
        OWNER,
        "/api/v1/extract/save",
        json!({"category_name": "Groceries", "entries": entries}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let saved = body_json(response).await;
    assert_eq!(saved["data"]["category"]["name"], "Groceries");
    assert_eq!(saved["data"]["summary"]["action_items_created"], 2);

    let response = post_json(
        common::build_test_app(pool.clone()),
        OWNER,
        "/api/v1/extract/save",
        json!({"category_name": "groceries", "entries": ["Eggs"]}),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["summary"]["categories_created"], 0);
    assert_eq!(category_names(&pool).await, vec!["Groceries".to_string()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_extract_image_rejects_unsupported_type(pool: PgPool) {
    let response = post_multipart(
        common::build_test_app(pool),
        OWNER,
        "/api/v1/extract/image",
        ("notes.gif", "image/gif", &b"GIF89a"[..]),
        &[],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_extract_image_returns_entries(pool: PgPool) {
    let app = common::build_test_app_with(
        pool,
        ScriptedGenerator::new(&[r#"["Pay rent", "Water plants"]"#]),
    );
    let response = post_multipart(
        app,
        OWNER,
        "/api/v1/extract/image",
        ("list.png", "image/png", &b"\x89PNG fake"[..]),
        &[],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["entries"],
        json!(["Pay rent", "Water plants"])
    );
}

// ---------------------------------------------------------------------------
// Enhance and combine
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_enhance_item_merges_new_steps(pool: PgPool) {
    let enhanced = r#"{"categories": [{"name": "Work", "items": [
        {"actionItem": "Email Bob the Q3 report", "nextSteps": ["draft", "Attach report"]}
    ]}]}"#;
    let app = common::build_test_app_with(
        pool.clone(),
        ScriptedGenerator::new(&[WORK_REPLY, enhanced]),
    );
    let ingested =
        body_json(post_json(app.clone(), OWNER, "/api/v1/transcripts", json!({"text": "email Bob"})).await)
            .await;
    let item_id = ingested["data"]["categories"][0]["items"][0]["id"].as_i64().unwrap();

    let response = post_json(
        app,
        OWNER,
        &format!("/api/v1/action-items/{item_id}/enhance"),
        json!({"transcript": "and attach the Q3 report"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let tree = body_json(response).await;
    let item = &tree["data"]["items"][0];
    assert_eq!(item["text"], "Email Bob the Q3 report");
    let steps: Vec<&str> = item["next_steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["text"].as_str().unwrap())
        .collect();
    assert_eq!(steps, vec!["Draft", "Send", "Attach report"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_combine_simple_merges_categories(pool: PgPool) {
    let mut ids = Vec::new();
    for name in ["Home", "Garden"] {
        let created = body_json(
            post_json(
                common::build_test_app(pool.clone()),
                OWNER,
                "/api/v1/categories",
                json!({"name": name}),
            )
            .await,
        )
        .await;
        let id = created["data"]["id"].as_i64().unwrap();
        post_json(
            common::build_test_app(pool.clone()),
            OWNER,
            &format!("/api/v1/categories/{id}/items"),
            json!({"text": format!("{name} chore")}),
        )
        .await;
        ids.push(id);
    }

    let response = post_json(
        common::build_test_app(pool.clone()),
        OWNER,
        "/api/v1/categories/combine",
        json!({"category_ids": ids}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let combined = body_json(response).await;
    assert_eq!(combined["data"]["name"], "Combined Category");
    assert_eq!(combined["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(category_names(&pool).await, vec!["Combined Category".to_string()]);

    let response = post_json(
        common::build_test_app(pool),
        OWNER,
        "/api/v1/categories/combine",
        json!({"category_ids": [ids[0]]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
