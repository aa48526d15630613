//! Outbound HTTP: the pooled client and the forwarder that relays approved requests to the
//! node.

pub mod errors;
pub mod forwarder;
pub mod http_client;

pub use errors::UpstreamError;
pub use forwarder::{Forwarder, UpstreamResponse, FRAMING_HEADERS};
pub use http_client::{build_http_client, HttpClientConfig};
