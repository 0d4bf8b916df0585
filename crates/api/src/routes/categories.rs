use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /                           -> list
/// POST   /                           -> create
/// POST   /combine                    -> combine
/// PUT    /{id}                       -> rename
/// DELETE /{id}                       -> delete
/// PUT    /{id}/status                -> set_status
/// POST   /{id}/convert-to-regular    -> convert_to_regular
/// POST   /{id}/enhance               -> enhance
/// POST   /{id}/items                 -> create_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route("/combine", post(categories::combine))
        .route("/{id}", put(categories::rename).delete(categories::delete))
        .route("/{id}/status", put(categories::set_status))
        .route("/{id}/convert-to-regular", post(categories::convert_to_regular))
        .route("/{id}/enhance", post(categories::enhance))
        .route("/{id}/items", post(categories::create_item))
}
