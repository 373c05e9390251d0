//! HTTP route handlers.

pub mod front;
pub mod upload;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with all routes and per-request layers.
///
/// `max_upload_bytes` caps request bodies; larger multipart uploads are
/// rejected before any storage call.
pub fn app(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .merge(front::router())
        .merge(upload::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
