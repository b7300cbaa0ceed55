//! Response bodies for the upload endpoint.

use serde::Serialize;
use serde_json::Value;

/// Message for a stored upload that was not analyzed.
pub const UPLOADED_MESSAGE: &str = "Video uploaded successfully!";

/// Message for a stored upload with an analysis attached.
pub const ANALYZED_MESSAGE: &str = "Video uploaded and analyzed successfully";

/// Successful `POST /api/upload` body.
///
/// Failures use the [`AppError`](crate::error::AppError) shape instead, so a
/// response never carries both.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    /// Generated file name, servable under `/uploads/{video}`.
    pub video: String,
    /// Analyzer output with server paths replaced by the stored name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,
}

impl UploadResponse {
    pub fn stored(video: String) -> Self {
        Self {
            message: UPLOADED_MESSAGE,
            video,
            analysis: None,
        }
    }

    pub fn analyzed(video: String, analysis: Value) -> Self {
        Self {
            message: ANALYZED_MESSAGE,
            video,
            analysis: Some(analysis),
        }
    }
}
