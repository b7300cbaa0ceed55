use std::path::PathBuf;

use analyst_core::analyzer::{AnalyzerError, FailureKind};
use analyst_core::error::CoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};

/// Message returned when an upload request carries no file.
pub const NO_VIDEO_MESSAGE: &str = "No video uploaded";

/// Longest diagnostic string ever returned to a client.
const MAX_DETAILS_LEN: usize = 2048;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `analyst_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The upload request contained no video file.
    #[error("No video uploaded")]
    NoFileProvided,

    /// The analyzer failed or printed something that is not a report.
    #[error("Analysis failed: {source}")]
    Analysis {
        #[source]
        source: AnalyzerError,
        /// Client-safe diagnostic, present only when exposure is enabled.
        details: Option<String>,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured upload limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Wrap an analyzer error, optionally attaching a redacted diagnostic.
    ///
    /// `sensitive` lists `(absolute path, replacement)` pairs scrubbed from
    /// the diagnostic before it can reach a client.
    pub fn analysis(
        source: AnalyzerError,
        expose_details: bool,
        sensitive: &[(PathBuf, String)],
    ) -> Self {
        let details = expose_details.then(|| redact(&source.diagnostic(), sensitive));
        Self::Analysis { source, details }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                    None,
                ),
                CoreError::Storage(err) => {
                    tracing::error!(error = %err, "Upload storage error");
                    internal()
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Upload intake ---
            AppError::NoFileProvided => {
                let body = json!({
                    "message": NO_VIDEO_MESSAGE,
                    "code": "NO_FILE_PROVIDED",
                });
                return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
            }

            // --- Analyzer ---
            AppError::Analysis { source, details } => {
                tracing::error!(
                    error = %source,
                    diagnostic = %source.diagnostic(),
                    "Video analysis failed",
                );
                let (code, message) = match source.kind() {
                    FailureKind::AnalyzerFailure => ("ANALYZER_FAILURE", "Video analysis failed"),
                    FailureKind::MalformedOutput => {
                        ("MALFORMED_OUTPUT", "Video analysis returned invalid output")
                    }
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code,
                    message.to_string(),
                    details.clone(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
                None,
            ),
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String, Option<String>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}

/// Replace every sensitive path in `text` and cap its length.
fn redact(text: &str, sensitive: &[(PathBuf, String)]) -> String {
    let mut out = scrub_paths(text, sensitive);

    if out.len() > MAX_DETAILS_LEN {
        let mut cut = MAX_DETAILS_LEN;
        while !out.is_char_boundary(cut) {
            cut -= 1;
        }
        out.truncate(cut);
    }
    out
}

/// Scrub sensitive paths from every string inside an analyzer document.
pub fn redact_json(value: &mut Value, sensitive: &[(PathBuf, String)]) {
    match value {
        Value::String(text) => *text = scrub_paths(text, sensitive),
        Value::Array(items) => {
            for item in items {
                redact_json(item, sensitive);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                redact_json(item, sensitive);
            }
        }
        _ => {}
    }
}

fn scrub_paths(text: &str, sensitive: &[(PathBuf, String)]) -> String {
    // Longest paths first so a directory never masks a file inside it.
    let mut pairs: Vec<(String, &str)> = sensitive
        .iter()
        .map(|(path, replacement)| (path.to_string_lossy().into_owned(), replacement.as_str()))
        .filter(|(path, _)| !path.is_empty())
        .collect();
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = text.to_string();
    for (path, replacement) in pairs {
        out = out.replace(&path, replacement);
    }
    out
}
