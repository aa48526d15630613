//! Integration tests for the Patroneos gateway.
//!
//! The real routers from the `server` crate are driven with `tower::ServiceExt::oneshot`;
//! `mockito` servers stand in for the nodeos node and for relay endpoints.
//!
//! - `filter_pipeline_tests`: rejection scenarios and what reaches the node
//! - `forwarding_tests`: response mirroring, transport failures, originating host
//! - `relay_tests`: event delivery from filters and the relay's event log
//! - `config_endpoint_tests`: live configuration read, replace and persistence
//! - `mock_infrastructure`: node/relay mocks and gateway fixtures
//!
//! ```bash
//! cargo test --package tests
//! ```

pub mod mock_infrastructure;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod config_endpoint_tests;
#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod filter_pipeline_tests;
