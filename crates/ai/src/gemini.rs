//! Gemini `generateContent` client.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use crate::config::AiConfig;
use crate::error::{ensure_success, AiError};
use crate::{ImageInput, TextGenerator};

/// Text generator backed by a Gemini model.
pub struct GeminiGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiGenerator {
    pub fn new(client: reqwest::Client, config: &AiConfig) -> Self {
        Self {
            client,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str, image: Option<ImageInput>) -> Result<String, AiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AiError::NotConfigured("GEMINI_API_KEY is not set"))?;

        let has_image = image.is_some();
        let response = self
            .client
            .post(format!("{}/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", api_key)
            .json(&request_body(prompt, image.as_ref()))
            .send()
            .await?;

        let body: Value = ensure_success(response).await?.json().await?;
        let text = candidate_text(&body).ok_or(AiError::EmptyResponse)?;

        tracing::debug!(
            model = %self.model,
            has_image,
            reply_chars = text.len(),
            "Gemini generation complete",
        );
        Ok(text)
    }
}

/// Build the `generateContent` payload: the prompt text, followed by the
/// image as base64 `inline_data` when present.
fn request_body(prompt: &str, image: Option<&ImageInput>) -> Value {
    let mut parts = vec![json!({ "text": prompt })];
    if let Some(image) = image {
        parts.push(json!({
            "inline_data": {
                "mime_type": image.mime_type,
                "data": STANDARD.encode(&image.bytes),
            }
        }));
    }
    json!({ "contents": [{ "parts": parts }] })
}

/// Join the text parts of the first candidate. `None` when there is no
/// candidate or the joined text is blank.
fn candidate_text(body: &Value) -> Option<String> {
    let text = body
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("\n");

    (!text.trim().is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn body_without_image_has_one_part() {
        let body = request_body("hello", None);
        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0]["text"], "hello");
    }

    #[test]
    fn body_with_image_inlines_base64() {
        let image = ImageInput {
            bytes: b"abc".to_vec(),
            mime_type: "image/png".into(),
        };
        let body = request_body("read this", Some(&image));
        let inline = &body["contents"][0]["parts"][1]["inline_data"];
        assert_eq!(inline["mime_type"], "image/png");
        assert_eq!(inline["data"], "YWJj");
    }

    #[test]
    fn candidate_text_joins_parts() {
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } }]
        });
        assert_eq!(candidate_text(&body).unwrap(), "{\"a\":\n1}");
    }

    #[test]
    fn candidate_text_none_when_blank_or_missing() {
        assert!(candidate_text(&json!({ "candidates": [] })).is_none());
        assert!(candidate_text(&json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }))
        .is_none());
        assert!(candidate_text(&json!({ "promptFeedback": { "blockReason": "SAFETY" } })).is_none());
    }

    #[tokio::test]
    async fn unconfigured_key_fails_before_any_request() {
        let generator = GeminiGenerator::new(reqwest::Client::new(), &AiConfig::default());
        let result = generator.generate("hi", None).await;
        assert_matches!(result, Err(AiError::NotConfigured(_)));
    }
}
