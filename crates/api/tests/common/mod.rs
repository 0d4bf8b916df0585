#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use taskvox_ai::{AiError, ImageInput, SpeechToText, TextGenerator};
use taskvox_api::auth::jwt::{generate_token, JwtConfig};
use taskvox_api::config::{ServerConfig, DEFAULT_MAX_UPLOAD_BYTES};
use taskvox_api::router::build_app_router;
use taskvox_api::state::AppState;

pub const OWNER: &str = "user-a";
pub const OTHER: &str = "user-b";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            token_expiry_mins: 15,
        },
    }
}

/// A valid Bearer token for `owner`.
pub fn token(owner: &str) -> String {
    generate_token(owner, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// AI fakes
// ---------------------------------------------------------------------------

/// Replays canned replies in order; fails with `EmptyResponse` when drained.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
}

impl ScriptedGenerator {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
        }
    }

    pub fn failing() -> Self {
        Self {
            replies: Mutex::new(VecDeque::from([Err(AiError::Api {
                status: 503,
                body: "overloaded".into(),
            })])),
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str, _image: Option<ImageInput>) -> Result<String, AiError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(AiError::EmptyResponse))
    }
}

pub struct FixedTranscriber(pub &'static str);

#[async_trait]
impl SpeechToText for FixedTranscriber {
    async fn transcribe(&self, _audio: Vec<u8>, _f: &str, _m: &str) -> Result<String, AiError> {
        Ok(self.0.to_string())
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// The production router and middleware stack over `pool`, with a model
/// that has no replies queued and no mailer.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, ScriptedGenerator::new(&[]))
}

/// As [`build_test_app`], with `generator` standing in for the model.
pub fn build_test_app_with(pool: PgPool, generator: ScriptedGenerator) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        generator: Arc::new(generator),
        transcriber: Arc::new(FixedTranscriber("Email Bob about the report")),
        mailer: None,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    owner: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(owner) = owner {
        builder = builder.header("authorization", format!("Bearer {}", token(owner)));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, owner: &str, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(owner), None).await
}

pub async fn post_json(
    app: Router,
    owner: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(owner), Some(body)).await
}

pub async fn post_empty(app: Router, owner: &str, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(owner), None).await
}

pub async fn put_json(
    app: Router,
    owner: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(owner), Some(body)).await
}

pub async fn delete(app: Router, owner: &str, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(owner), None).await
}

/// POST a single-file multipart body (part name `file`) plus text fields.
pub async fn post_multipart(
    app: Router,
    owner: &str,
    uri: &str,
    file: (&str, &str, &[u8]),
    fields: &[(&str, &str)],
) -> Response<Body> {
    const BOUNDARY: &str = "taskvox-test-boundary";
    let (filename, content_type, bytes) = file;

    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token(owner)))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
