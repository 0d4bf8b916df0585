pub mod action_items;
pub mod categories;
pub mod extract;
pub mod health;
pub mod next_steps;
pub mod refine;
pub mod share;
pub mod transcripts;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree. Every route requires a Bearer token.
///
/// ```text
/// /transcripts                                 ingest text (POST), history (GET)
/// /transcripts/audio                           ingest a recording (POST, multipart)
///
/// /categories                                  nested list (GET), create (POST)
/// /categories/combine                          combine N categories (POST)
/// /categories/{id}                             rename (PUT), subtree delete (DELETE)
/// /categories/{id}/status                      completion toggle (PUT)
/// /categories/{id}/convert-to-regular          convert daily items (POST)
/// /categories/{id}/enhance                     merge from transcript (POST)
/// /categories/{id}/items                       create action item (POST)
///
/// /action-items/{id}                           edit (PUT), delete (DELETE)
/// /action-items/{id}/status                    pending/completed (PUT)
/// /action-items/{id}/convert-to-regular        convert (POST)
/// /action-items/{id}/enhance                   merge from transcript (POST)
/// /action-items/{id}/next-steps                add next step (POST)
///
/// /next-steps/{id}                             edit (PUT), delete (DELETE)
///
/// /refine/propose                              AI proposal (POST)
/// /refine/accept                               replace hierarchy (POST)
///
/// /extract/image                               image to list (POST, multipart)
/// /extract/text                                text to list (POST)
/// /extract/save                                append list to category (POST)
///
/// /search?q=                                   nested search (GET)
/// /share/email                                 email the list (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/transcripts", transcripts::router())
        .nest("/categories", categories::router())
        .nest("/action-items", action_items::router())
        .nest("/next-steps", next_steps::router())
        .nest("/refine", refine::router())
        .nest("/extract", extract::router())
        .nest("/share", share::router())
        .route("/search", get(handlers::search::search))
}
