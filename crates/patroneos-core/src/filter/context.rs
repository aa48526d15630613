use crate::{config::FilterConfig, types::Transaction};
use bytes::Bytes;
use std::sync::{Arc, OnceLock};

/// Failure to decode a JSON body into transactions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("PARSE_ERROR: {0}")]
pub struct ExtractionError(pub String);

/// Shape of a request body, decided by its first non-whitespace byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    Empty,
    Object,
    Array,
    /// Anything else, including JSON scalars. Never transaction-shaped.
    Other,
}

impl BodyShape {
    #[must_use]
    pub fn of(body: &[u8]) -> Self {
        match body.trim_ascii_start().first() {
            None => Self::Empty,
            Some(b'{') => Self::Object,
            Some(b'[') => Self::Array,
            Some(_) => Self::Other,
        }
    }
}

/// Decodes a request body into the transactions it carries.
///
/// An object is one transaction, an array is a batch; empty or otherwise-shaped bodies carry
/// none.
///
/// # Errors
///
/// Returns [`ExtractionError`] when an object or array body does not decode.
pub fn extract_transactions(body: &[u8]) -> Result<Vec<Transaction>, ExtractionError> {
    match BodyShape::of(body) {
        BodyShape::Object => serde_json::from_slice::<Transaction>(body)
            .map(|transaction| vec![transaction])
            .map_err(|e| ExtractionError(e.to_string())),
        BodyShape::Array => serde_json::from_slice::<Vec<Transaction>>(body)
            .map_err(|e| ExtractionError(e.to_string())),
        BodyShape::Empty | BodyShape::Other => Ok(Vec::new()),
    }
}

/// State owned by one inbound request for the duration of its evaluation.
///
/// Holds the fully-read body, the configuration snapshot taken when the request arrived, the
/// originating host, and the lazily-populated extraction cache. The body stays available as
/// [`Bytes`] after extraction so the forwarder sends the exact bytes the client did.
#[derive(Debug)]
pub struct RequestContext {
    config: Arc<FilterConfig>,
    remote_host: String,
    body: Bytes,
    transactions: OnceLock<Result<Vec<Transaction>, ExtractionError>>,
}

impl RequestContext {
    #[must_use]
    pub fn new(config: Arc<FilterConfig>, remote_host: impl Into<String>, body: Bytes) -> Self {
        Self { config, remote_host: remote_host.into(), body, transactions: OnceLock::new() }
    }

    #[must_use]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    #[must_use]
    pub fn remote_host(&self) -> &str {
        &self.remote_host
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Transactions carried by the body, decoded on first call and cached for the rest of the
    /// request.
    ///
    /// # Errors
    ///
    /// Returns the cached [`ExtractionError`] if the body did not decode.
    pub fn transactions(&self) -> Result<&[Transaction], &ExtractionError> {
        self.transactions.get_or_init(|| extract_transactions(&self.body)).as_deref()
    }

    /// Whether extraction has already run for this request.
    #[must_use]
    pub fn is_extracted(&self) -> bool {
        self.transactions.get().is_some()
    }
}
