//! Transcript ingestion: free text (or recorded audio) in, categorized
//! action items appended to the owner's hierarchy.

use serde::Serialize;
use sqlx::PgPool;
use taskvox_ai::{SpeechToText, TextGenerator};
use taskvox_core::prompts::ingest_prompt;
use taskvox_core::status::{validate_item_type, SOURCE_TEXT, SOURCE_VOICE};
use taskvox_db::models::hierarchy::{ApplySummary, CategoryTree};
use taskvox_db::models::transcript::Transcript;
use taskvox_db::repositories::HierarchyRepo;

use crate::error::PipelineError;
use crate::structured::generate_categories;

/// A recorded audio file as uploaded.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

/// Result of one ingestion run.
#[derive(Debug, Serialize)]
pub struct IngestOutcome {
    pub transcript: Transcript,
    pub summary: ApplySummary,
    /// The owner's hierarchy for `item_type` after the append.
    pub categories: Vec<CategoryTree>,
}

/// Organize `text` into categories with the model and append them.
///
/// The transcript row is written only after the reply validated, in the
/// same transaction as the append: a failed append leaves no transcript.
pub async fn ingest_transcript(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    owner_id: &str,
    text: &str,
    source: &str,
    item_type: &str,
) -> Result<IngestOutcome, PipelineError> {
    validate_item_type(item_type)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(PipelineError::invalid("Transcript text must not be empty"));
    }

    let categories =
        generate_categories(generator, "ingest", &ingest_prompt(text, item_type)).await?;

    let (transcript, summary) =
        HierarchyRepo::ingest_structure(pool, owner_id, text, source, &categories, item_type)
            .await?;

    Ok(IngestOutcome {
        transcript,
        summary,
        categories: HierarchyRepo::load(pool, owner_id, Some(item_type)).await?,
    })
}

/// Transcribe recorded audio, then ingest the text as a `voice` transcript.
pub async fn ingest_audio(
    pool: &PgPool,
    stt: &dyn SpeechToText,
    generator: &dyn TextGenerator,
    owner_id: &str,
    audio: AudioUpload,
    item_type: &str,
) -> Result<IngestOutcome, PipelineError> {
    validate_item_type(item_type)?;
    if audio.bytes.is_empty() {
        return Err(PipelineError::invalid("Audio upload is empty"));
    }

    let text = stt
        .transcribe(audio.bytes, &audio.filename, &audio.mime_type)
        .await?;
    ingest_transcript(pool, generator, owner_id, &text, SOURCE_VOICE, item_type).await
}

/// Ingest typed text. Shorthand for [`ingest_transcript`] with the `text`
/// source.
pub async fn ingest_text(
    pool: &PgPool,
    generator: &dyn TextGenerator,
    owner_id: &str,
    text: &str,
    item_type: &str,
) -> Result<IngestOutcome, PipelineError> {
    ingest_transcript(pool, generator, owner_id, text, SOURCE_TEXT, item_type).await
}
