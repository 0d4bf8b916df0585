//! AI client configuration loaded from environment variables.

use std::time::Duration;

/// Default OpenAI transcription model.
pub const DEFAULT_TRANSCRIBE_MODEL: &str = "whisper-1";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default per-request timeout for AI calls, in seconds.
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Settings shared by the AI clients.
///
/// | Env var                   | Default              |
/// |---------------------------|----------------------|
/// | `OPENAI_API_KEY`          | (unset: STT disabled) |
/// | `OPENAI_BASE_URL`         | `https://api.openai.com/v1` |
/// | `OPENAI_TRANSCRIBE_MODEL` | `whisper-1`          |
/// | `GEMINI_API_KEY`          | (unset: generation disabled) |
/// | `GEMINI_BASE_URL`         | public `v1beta/models` endpoint |
/// | `GEMINI_MODEL`            | `gemini-1.5-flash`   |
/// | `AI_TIMEOUT_SECS`         | `60`                 |
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub transcribe_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: OPENAI_BASE_URL.to_string(),
            transcribe_model: DEFAULT_TRANSCRIBE_MODEL.to_string(),
            gemini_api_key: None,
            gemini_base_url: GEMINI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

impl AiConfig {
    /// Load from the environment. Missing keys leave the matching client
    /// unconfigured; its calls then fail with [`crate::AiError::NotConfigured`].
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            openai_api_key: non_blank_env("OPENAI_API_KEY"),
            openai_base_url: non_blank_env("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            transcribe_model: non_blank_env("OPENAI_TRANSCRIBE_MODEL")
                .unwrap_or(defaults.transcribe_model),
            gemini_api_key: non_blank_env("GEMINI_API_KEY"),
            gemini_base_url: non_blank_env("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            gemini_model: non_blank_env("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            timeout: std::env::var("AI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }

    /// A `reqwest` client with the configured timeout applied.
    pub fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder().timeout(self.timeout).build()
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_endpoints() {
        let config = AiConfig::default();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.transcribe_model, DEFAULT_TRANSCRIBE_MODEL);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert!(config.gemini_base_url.starts_with("https://"));
    }
}
