use std::sync::Arc;

use taskvox_ai::{SpeechToText, TextGenerator};
use taskvox_notify::ListMailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable. The AI and mail clients are constructed once in
/// `main` (or by tests, with fakes) and handed to the pipeline per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: taskvox_db::DbPool,
    pub config: Arc<ServerConfig>,
    pub generator: Arc<dyn TextGenerator>,
    pub transcriber: Arc<dyn SpeechToText>,
    /// `None` when SMTP is not configured; sharing by email is then refused.
    pub mailer: Option<Arc<ListMailer>>,
}
