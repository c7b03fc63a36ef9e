//! Error

/// Any failure talking to the article API
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The request could not be sent or the body could not be read
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The API answered with a non-success status
    #[error("unexpected status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, or the `detail` field of a JSON error body
        message: String,
    },
    /// The body is not the expected JSON document
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl NetworkError {
    /// Builds a status error from a response body
    pub(crate) fn status(status: u16, body: &str) -> Self {
        // FastAPI error bodies look like {"detail": "..."}
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("detail").map(|d| d.to_string()))
            .map(|detail| detail.trim_matches('"').to_string())
            .unwrap_or_else(|| body.to_string());
        NetworkError::Status { status, message }
    }
}
