use thiserror::Error;

/// Transport-level failures talking to the node or to relay endpoints.
///
/// An HTTP response with a non-success status is not an error here: the forwarder mirrors it
/// to the client and reports `TRANSACTION_FAILED`.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("request timed out")]
    Timeout,

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl UpstreamError {
    /// Classifies a reqwest error without leaking addresses into client-visible text.
    #[must_use]
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_builder() {
            Self::InvalidRequest(error.to_string())
        } else if error.is_body() || error.is_decode() {
            Self::Body(super::http_client::sanitize_network_error(error).to_string())
        } else {
            Self::ConnectionFailed(super::http_client::sanitize_network_error(error).to_string())
        }
    }

    /// Code returned to clients when forwarding fails.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout => "UPSTREAM_TIMEOUT",
            _ => "UPSTREAM_UNAVAILABLE",
        }
    }

    /// HTTP status returned to clients when forwarding fails: 504 for timeouts, 502 otherwise.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Timeout => 504,
            _ => 502,
        }
    }
}
