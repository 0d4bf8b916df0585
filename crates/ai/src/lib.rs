//! Clients for the external AI services.
//!
//! The pipeline only sees the [`SpeechToText`] and [`TextGenerator`] traits,
//! so the concrete HTTP clients can be swapped for fakes in tests.
//!
//! - [`openai`] -- speech-to-text over the OpenAI transcription endpoint.
//! - [`gemini`] -- text (and image-plus-text) generation over Gemini
//!   `generateContent`.

pub mod config;
pub mod error;
pub mod gemini;
pub mod openai;

use async_trait::async_trait;

pub use config::AiConfig;
pub use error::AiError;
pub use gemini::GeminiGenerator;
pub use openai::OpenAiTranscriber;

/// An image attached to a generation request.
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    /// e.g. `image/png`.
    pub mime_type: String,
}

/// Converts recorded audio into text.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(
        &self,
        audio: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<String, AiError>;
}

/// Produces free-form text from a prompt and an optional image.
///
/// Replies are raw model output; callers run them through the normalizer
/// and validator before use.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, image: Option<ImageInput>) -> Result<String, AiError>;
}
