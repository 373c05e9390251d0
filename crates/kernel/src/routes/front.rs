//! Front route handler.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Greeting returned from the root route.
#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
}

/// Create the front router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(root))
}

/// GET /
///
/// Always answers, independent of storage or downstream health.
async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Hello World",
    })
}
