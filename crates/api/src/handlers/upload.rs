//! Handler for `POST /api/upload`.
//!
//! Stores the uploaded video, runs the analyzer on it (when one is
//! configured) and relays the report. The stored file always exists on disk
//! before its name appears in a response.

use std::path::PathBuf;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{redact_json, AppError, AppResult};
use crate::response::UploadResponse;
use crate::state::AppState;

/// Multipart field carrying the video.
pub const VIDEO_FIELD: &str = "video";

/// Replacement for the uploads directory in client-visible diagnostics.
const UPLOADS_PLACEHOLDER: &str = "<uploads>";

/// POST /api/upload
///
/// Accepts one `video` file field; any other fields (player names included)
/// are ignored. A request that is not multipart at all counts as carrying
/// no file.
pub async fn upload_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Upload is not a multipart request");
        AppError::NoFileProvided
    })?;

    let mut video: Option<(String, axum::body::Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        // Browsers send an empty, nameless part when no file was chosen.
        if file_name.is_empty() && data.is_empty() {
            continue;
        }

        if video.is_some() {
            return Err(AppError::BadRequest(
                "Only one video may be uploaded per request".into(),
            ));
        }
        video = Some((file_name, data));
    }

    let (file_name, data) = video.ok_or(AppError::NoFileProvided)?;

    let stored = state.uploads.store(&file_name, &data).await?;

    let Some(analyzer) = state.analyzer.as_ref() else {
        return Ok(Json(UploadResponse::stored(stored.file_name)));
    };

    // Paths never leave the server, whether the analyzer succeeds or not.
    let sensitive: [(PathBuf, String); 2] = [
        (stored.path.clone(), stored.file_name.clone()),
        (
            state.uploads.dir().to_path_buf(),
            UPLOADS_PLACEHOLDER.to_string(),
        ),
    ];

    match analyzer.analyze(&stored.path).await {
        Ok(mut analysis) => {
            tracing::info!(
                video = %stored.file_name,
                duration_ms = analysis.duration_ms,
                "Analysis complete",
            );
            redact_json(&mut analysis.raw, &sensitive);
            Ok(Json(UploadResponse::analyzed(stored.file_name, analysis.raw)))
        }
        Err(err) => Err(AppError::analysis(
            err,
            state.config.expose_analyzer_diagnostics,
            &sensitive,
        )),
    }
}

/// Map a multipart read failure onto the matching HTTP error.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}
