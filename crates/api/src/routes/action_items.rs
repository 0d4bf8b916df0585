use axum::routing::{post, put};
use axum::Router;

use crate::handlers::action_items;
use crate::state::AppState;

/// Routes mounted at `/action-items`.
///
/// ```text
/// PUT    /{id}                       -> update
/// DELETE /{id}                       -> delete
/// PUT    /{id}/status                -> set_status
/// POST   /{id}/convert-to-regular    -> convert_to_regular
/// POST   /{id}/enhance               -> enhance
/// POST   /{id}/next-steps            -> create_next_step
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(action_items::update).delete(action_items::delete))
        .route("/{id}/status", put(action_items::set_status))
        .route(
            "/{id}/convert-to-regular",
            post(action_items::convert_to_regular),
        )
        .route("/{id}/enhance", post(action_items::enhance))
        .route("/{id}/next-steps", post(action_items::create_next_step))
}
