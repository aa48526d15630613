//! Gateway configuration.
//!
//! Two layers live here:
//!
//! - [`FilterConfig`]: the JSON document exchanged through `GET`/`POST /patroneos/config` and
//!   persisted to the configuration file. Field names follow the camelCase wire format.
//! - [`RuntimeSettings`]: process-level knobs (mode, timeouts, logging) that are not part of
//!   the exchanged document, layered from defaults and `PATRONEOS__*` environment variables.
//!
//! The active [`FilterConfig`] is held by a [`ConfigStore`], which hands out consistent
//! snapshots and replaces the whole document atomically.
//!
//! # Example
//!
//! ```json
//! {
//!     "listenPort": "8081",
//!     "nodeosProtocol": "http",
//!     "nodeosUrl": "localhost",
//!     "nodeosPort": "8888",
//!     "contractBlackList": { "currency": true },
//!     "maxSignatures": 10,
//!     "maxTransactionSize": 1000000,
//!     "maxTransactions": 10,
//!     "logEndpoints": ["http://relay.internal:8081"],
//!     "filterEndpoints": [],
//!     "logFileLocation": "/var/log/patroneos.log"
//! }
//! ```

pub mod settings;
pub mod store;

pub use settings::{LoggingSettings, Mode, RuntimeSettings};
pub use store::ConfigStore;

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, net::SocketAddr, path::PathBuf};

/// Errors raised while loading, validating or persisting configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("failed to write configuration file {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to load runtime settings: {0}")]
    Settings(#[from] config::ConfigError),
}

/// Active filter configuration, exchanged and persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    /// Port the gateway listens on, kept as a string to match existing config files.
    #[serde(default)]
    pub listen_port: String,

    /// `http` or `https`.
    #[serde(default)]
    pub nodeos_protocol: String,

    /// Host name of the upstream node.
    #[serde(default)]
    pub nodeos_url: String,

    #[serde(default)]
    pub nodeos_port: String,

    /// Listed contract names are refused; the mapped value is not consulted.
    #[serde(default, rename = "contractBlackList")]
    pub contract_black_list: BTreeMap<String, bool>,

    #[serde(default)]
    pub max_signatures: usize,

    /// Maximum action `data` length in bytes.
    #[serde(default)]
    pub max_transaction_size: usize,

    #[serde(default)]
    pub max_transactions: usize,

    /// Base URLs of relay nodes receiving outcome events.
    #[serde(default)]
    pub log_endpoints: Vec<String>,

    /// Reserved for filter discovery; carried but unused.
    #[serde(default)]
    pub filter_endpoints: Vec<String>,

    /// Relay role only: file the event log is appended to.
    #[serde(default)]
    pub log_file_location: String,
}

impl FilterConfig {
    /// Decodes a configuration document and validates it for the role `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the bytes do not decode (negative thresholds
    /// included) and [`ConfigError::Invalid`] when [`validate`](Self::validate) fails.
    pub fn from_slice(bytes: &[u8], mode: Mode) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate(mode)?;
        Ok(config)
    }

    /// Base URL of the upstream node, e.g. `http://localhost:8888`.
    #[must_use]
    pub fn upstream_base_url(&self) -> String {
        format!("{}://{}:{}", self.nodeos_protocol, self.nodeos_url, self.nodeos_port)
    }

    /// Address the gateway binds to: all interfaces on `listenPort`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `listenPort` is not a valid port number.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let port = parse_port("listenPort", &self.listen_port)?;
        Ok(SocketAddr::from(([0, 0, 0, 0], port)))
    }

    /// A listed contract is refused whatever value it maps to.
    #[must_use]
    pub fn is_blacklisted(&self, contract: &str) -> bool {
        self.contract_black_list.contains_key(contract)
    }

    /// Sanity checks applied before a configuration becomes active.
    ///
    /// Both roles need a valid `listenPort` and absolute http(s) endpoint URLs. A filter also
    /// needs a reachable node address (`nodeosProtocol` of `http` or `https`, non-empty
    /// `nodeosUrl`, valid `nodeosPort`); a relay never contacts the node and needs
    /// `logFileLocation` instead. Thresholds are unsigned and need no check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first failing check.
    pub fn validate(&self, mode: Mode) -> Result<(), ConfigError> {
        parse_port("listenPort", &self.listen_port)?;

        match mode {
            Mode::Filter => {
                if !matches!(self.nodeos_protocol.as_str(), "http" | "https") {
                    return Err(ConfigError::Invalid(format!(
                        "nodeosProtocol must be 'http' or 'https', got '{}'",
                        self.nodeos_protocol
                    )));
                }

                if self.nodeos_url.trim().is_empty() {
                    return Err(ConfigError::Invalid("nodeosUrl must not be empty".to_string()));
                }

                parse_port("nodeosPort", &self.nodeos_port)?;
            }
            Mode::Fail2banRelay => {
                if self.log_file_location.trim().is_empty() {
                    return Err(ConfigError::Invalid(
                        "logFileLocation must be set when running as a fail2ban relay".to_string(),
                    ));
                }
            }
        }

        for endpoint in self.log_endpoints.iter().chain(&self.filter_endpoints) {
            validate_endpoint(endpoint)?;
        }

        Ok(())
    }
}

fn parse_port(field: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|port| *port > 0)
        .ok_or_else(|| ConfigError::Invalid(format!("{field} is not a valid port: '{value}'")))
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(endpoint)
        .map_err(|e| ConfigError::Invalid(format!("invalid endpoint URL '{endpoint}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!(
            "endpoint URL '{endpoint}' must use http or https"
        )));
    }

    Ok(())
}
