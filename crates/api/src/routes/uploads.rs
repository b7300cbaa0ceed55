use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::state::AppState;

/// URL prefix under which stored videos are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// GET /uploads/{name} -- stream a stored video by its generated name.
///
/// Only names the upload store recognises are served. `ServeFile` handles
/// range requests, which players need for seeking.
async fn serve_upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Response {
    let Some(path) = state.uploads.resolve(&name).await else {
        tracing::debug!(video = %name, "Requested upload not found");
        return StatusCode::NOT_FOUND.into_response();
    };

    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Mount the stored-video routes.
pub fn router() -> Router<AppState> {
    Router::new().route(&format!("{UPLOADS_PREFIX}/{{name}}"), get(serve_upload))
}
