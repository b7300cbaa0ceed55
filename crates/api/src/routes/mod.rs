pub mod health;
pub mod uploads;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /upload        POST  store a video, analyze it, return the report
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/upload", post(handlers::upload::upload_video))
}
