//! Data store error types.

/// Errors from the hosted data store's REST API.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        /// Truncated response body, kept for diagnostics.
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Client-side failure before any request was sent
    #[error("client error: {message}")]
    Client { message: String },

    /// Rate limited by the API
    #[error("rate limited by the data store")]
    RateLimited,

    /// Invalid API key or unauthorized
    #[error("unauthorized: check BUS_STORE_URL and BUS_STORE_API_KEY")]
    Unauthorized,

    /// Fixture data could not be loaded (mock client)
    #[error("fixture error: {message}")]
    Fixture { message: String },
}
