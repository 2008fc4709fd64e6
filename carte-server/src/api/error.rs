//! API client error types.

/// Errors that can occur when fetching from the stops/routes API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (connection refused, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Mock data could not be loaded
    #[error("mock data error: {message}")]
    Mock { message: String },
}
