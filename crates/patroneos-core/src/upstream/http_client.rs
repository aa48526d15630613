use super::UpstreamError;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Settings for the outbound HTTP client shared by the forwarder and the event reporter.
///
/// Per-call timeouts are applied by each caller; the client only bounds connection setup.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub connect_timeout: Duration,
    pub pool_idle_timeout: Duration,
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            pool_idle_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 100,
        }
    }
}

/// Builds the pooled client.
///
/// Redirects are not followed so the client sees exactly what the node answered.
///
/// # Errors
///
/// Returns [`UpstreamError::ClientBuild`] if the TLS backend fails to initialize.
pub fn build_http_client(config: &HttpClientConfig) -> Result<Client, UpstreamError> {
    ClientBuilder::new()
        .pool_idle_timeout(config.pool_idle_timeout)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .connect_timeout(config.connect_timeout)
        .use_rustls_tls()
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(concat!("patroneos/", env!("CARGO_PKG_VERSION")))
        .tcp_keepalive(Duration::from_secs(30))
        .tcp_nodelay(true)
        .build()
        .map_err(|e| {
            tracing::error!(error = %e, "failed to build http client");
            UpstreamError::ClientBuild(e.to_string())
        })
}

/// Maps a reqwest error to a message that does not leak upstream addresses.
#[must_use]
pub fn sanitize_network_error(error: &reqwest::Error) -> &'static str {
    if error.is_connect() {
        "connection refused or unreachable"
    } else if error.is_timeout() {
        "connection timed out"
    } else if error.is_request() {
        "request failed"
    } else if error.is_body() {
        "response body error"
    } else if error.is_redirect() {
        "too many redirects"
    } else {
        "network error"
    }
}
