use axum::routing::post;
use axum::Router;

use crate::handlers::share;
use crate::state::AppState;

/// Routes mounted at `/share`.
pub fn router() -> Router<AppState> {
    Router::new().route("/email", post(share::share_email))
}
