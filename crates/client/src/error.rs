use analyst_core::error::CoreError;

/// Errors surfaced by the upload client.
///
/// Every variant is terminal for the current upload; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Submit was pressed with no video selected. No request is made.
    #[error("Please select a video first")]
    NoFileSelected,

    /// Another upload from this session has not settled yet.
    #[error("An upload is already in progress")]
    RequestInFlight,

    /// The selected video could not be read.
    #[error("Could not read video: {0}")]
    Io(#[from] std::io::Error),

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with something that is not the expected JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The server rejected the upload or the analysis failed.
    #[error("{message}{}", details_suffix(.details))]
    Server {
        status: u16,
        message: String,
        details: Option<String>,
    },

    /// A local selection was rejected, e.g. an unknown camera angle.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// ` (details)` when the server sent diagnostics, empty otherwise.
fn details_suffix(details: &Option<String>) -> String {
    match details {
        Some(d) if !d.is_empty() => format!(" ({d})"),
        _ => String::new(),
    }
}
