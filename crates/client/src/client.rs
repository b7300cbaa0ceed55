//! HTTP side of the upload client.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;

/// Default server address when `ANALYST_SERVER_URL` is unset.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Multipart field the server reads the video from.
const VIDEO_FIELD: &str = "video";

/// Successful body of `POST /api/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadReply {
    #[serde(default)]
    pub message: Option<String>,
    /// Generated name of the stored video.
    #[serde(default)]
    pub video: Option<String>,
    /// Analyzer output, verbatim.
    #[serde(default)]
    pub analysis: Option<Value>,
}

/// Thin wrapper over `reqwest` for the upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadClient {
    http: reqwest::Client,
    base_url: String,
}

impl UploadClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL at which the server serves a stored video.
    pub fn video_url(&self, video: &str) -> String {
        format!("{}/uploads/{video}", self.base_url)
    }

    /// Upload the file at `path` and wait for the server's verdict.
    pub async fn upload(&self, path: &Path) -> Result<UploadReply, ClientError> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());

        tracing::info!(file = %file_name, bytes = data.len(), "Uploading video");

        let form = Form::new().part(VIDEO_FIELD, Part::bytes(data).file_name(file_name));

        let response = self
            .http
            .post(format!("{}/api/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let json: Value = serde_json::from_str(&body).map_err(|e| {
            ClientError::InvalidResponse(format!("HTTP {status}: body is not JSON ({e})"))
        })?;

        if !status.is_success() {
            return Err(server_error(status.as_u16(), &json));
        }

        serde_json::from_value(json).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}

/// Build a [`ClientError::Server`] from an error body, which carries either
/// `message` (missing file) or `error` (everything else).
fn server_error(status: u16, body: &Value) -> ClientError {
    let message = body
        .get("error")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Server responded with HTTP {status}"));
    let details = body
        .get("details")
        .and_then(Value::as_str)
        .map(str::to_string);

    ClientError::Server {
        status,
        message,
        details,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = UploadClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.video_url("1-ab-match.mp4"),
            "http://localhost:5000/uploads/1-ab-match.mp4"
        );
    }

    #[test]
    fn server_error_prefers_error_field() {
        let err = server_error(
            500,
            &json!({"error": "Video analysis failed", "code": "ANALYZER_FAILURE", "details": "exit 1"}),
        );
        assert_matches!(
            err,
            ClientError::Server { status: 500, ref message, details: Some(ref d) }
                if message == "Video analysis failed" && d == "exit 1"
        );
    }

    #[test]
    fn server_error_falls_back_to_message_then_status() {
        let err = server_error(400, &json!({"message": "No video uploaded"}));
        assert_eq!(err.to_string(), "No video uploaded");

        let err = server_error(502, &json!({}));
        assert_eq!(err.to_string(), "Server responded with HTTP 502");
    }

    #[test]
    fn reply_fields_are_optional() {
        let reply: UploadReply = serde_json::from_value(json!({})).expect("decode");
        assert!(reply.message.is_none());
        assert!(reply.video.is_none());
        assert!(reply.analysis.is_none());
    }
}
