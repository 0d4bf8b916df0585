use axum::routing::post;
use axum::Router;

use crate::handlers::extract;
use crate::state::AppState;

/// Routes mounted at `/extract`.
///
/// ```text
/// POST /image   -> from_image (multipart)
/// POST /text    -> from_text
/// POST /save    -> save
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/image", post(extract::from_image))
        .route("/text", post(extract::from_text))
        .route("/save", post(extract::save))
}
