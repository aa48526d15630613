use super::UpstreamError;
use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONNECTION, CONTENT_LENGTH, TRANSFER_ENCODING},
    Client, Method, StatusCode,
};
use std::time::Duration;
use tracing::debug;

/// Response headers the local server frames itself and must not copy from the node.
pub static FRAMING_HEADERS: [HeaderName; 3] = [CONTENT_LENGTH, TRANSFER_ENCODING, CONNECTION];

/// A fully-read response from the node.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl UpstreamResponse {
    /// Only a plain `200` counts as an accepted transaction.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == StatusCode::OK
    }

    /// Headers to copy onto the client response, in upstream order, minus framing headers.
    pub fn mirrored_headers(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.headers.iter().filter(|(name, _)| !FRAMING_HEADERS.contains(*name))
    }
}

/// Relays approved requests to the node with the same method, path, query and body.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    timeout: Duration,
}

impl Forwarder {
    #[must_use]
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Sends the request to `base_url` + `path_and_query` and reads the whole response.
    ///
    /// No retries: a transaction push is not idempotent from the client's point of view.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError`] for transport failures (URL, connect, timeout, body read).
    /// Non-success statuses are returned as a normal [`UpstreamResponse`].
    pub async fn forward(
        &self,
        base_url: &str,
        method: Method,
        path_and_query: &str,
        body: Bytes,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let url = format!("{}{path_and_query}", base_url.trim_end_matches('/'));
        debug!(%method, url = %url, body_bytes = body.len(), "forwarding request to node");

        let response = self
            .client
            .request(method, &url)
            .body(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(&e))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(|e| UpstreamError::from_reqwest(&e))?;

        debug!(status = status.as_u16(), body_bytes = body.len(), "node responded");
        Ok(UpstreamResponse { status, headers, body })
    }
}
