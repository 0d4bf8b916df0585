//! OpenAI audio transcription client.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::AiConfig;
use crate::error::{ensure_success, AiError};
use crate::SpeechToText;

/// Speech-to-text backed by the OpenAI `/audio/transcriptions` endpoint.
pub struct OpenAiTranscriber {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl OpenAiTranscriber {
    pub fn new(client: reqwest::Client, config: &AiConfig) -> Self {
        Self {
            client,
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.transcribe_model.clone(),
            api_key: config.openai_api_key.clone(),
        }
    }
}

#[async_trait]
impl SpeechToText for OpenAiTranscriber {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<String, AiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AiError::NotConfigured("OPENAI_API_KEY is not set"))?;

        let audio_bytes = audio.len();
        let file = Part::bytes(audio)
            .file_name(filename.to_string())
            .mime_str(mime_type)?;
        let form = Form::new()
            .part("file", file)
            .text("model", self.model.clone());

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await?;

        let body: TranscriptionResponse = ensure_success(response).await?.json().await?;
        let text = body.text.trim().to_string();
        if text.is_empty() {
            return Err(AiError::EmptyResponse);
        }

        tracing::debug!(audio_bytes, transcript_chars = text.len(), "Audio transcribed");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn unconfigured_key_fails_before_any_request() {
        let stt = OpenAiTranscriber::new(reqwest::Client::new(), &AiConfig::default());
        let result = stt.transcribe(vec![0, 1, 2], "note.webm", "audio/webm").await;
        assert_matches!(result, Err(AiError::NotConfigured(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = AiConfig {
            openai_base_url: "http://localhost:9000/v1/".into(),
            ..AiConfig::default()
        };
        let stt = OpenAiTranscriber::new(reqwest::Client::new(), &config);
        assert_eq!(stt.base_url, "http://localhost:9000/v1");
    }
}
