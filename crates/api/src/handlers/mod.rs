//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers take the [`AuthUser`](crate::middleware::auth::AuthUser)
//! extractor, delegate to `taskvox_db` repositories or `taskvox_pipeline`
//! flows, and map errors via [`AppError`].

pub mod action_items;
pub mod categories;
pub mod extract;
pub mod next_steps;
pub mod refine;
pub mod search;
pub mod share;
pub mod transcripts;

use std::collections::HashMap;

use axum::extract::Multipart;
use serde::Serialize;
use taskvox_core::error::CoreError;

use crate::error::{AppError, AppResult};

/// Response body for the convert-to-regular endpoints.
#[derive(Debug, Serialize)]
pub struct ConvertResult {
    /// Items whose type changed; `0` when nothing was daily.
    pub converted: u64,
}

/// The file part of a multipart upload.
#[derive(Debug)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

/// A parsed multipart form: the part named `file` plus every other part as
/// text.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub fn take_file(&mut self) -> AppResult<UploadedFile> {
        self.file
            .take()
            .ok_or_else(|| AppError::BadRequest("Missing 'file' part in multipart body".into()))
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }
}

/// Drain a multipart body into an [`UploadForm`].
pub async fn read_upload_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let filename = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.file = Some(UploadedFile {
                bytes: bytes.to_vec(),
                filename,
                content_type,
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

/// Reject blank required text with a 400.
pub(crate) fn require_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} must not be empty"
        ))));
    }
    Ok(trimmed.to_string())
}
