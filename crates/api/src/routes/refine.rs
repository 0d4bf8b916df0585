use axum::routing::post;
use axum::Router;

use crate::handlers::refine;
use crate::state::AppState;

/// Routes mounted at `/refine`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/propose", post(refine::propose))
        .route("/accept", post(refine::accept))
}
