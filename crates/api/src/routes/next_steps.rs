use axum::routing::put;
use axum::Router;

use crate::handlers::next_steps;
use crate::state::AppState;

/// Routes mounted at `/next-steps`.
///
/// ```text
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", put(next_steps::update).delete(next_steps::delete))
}
