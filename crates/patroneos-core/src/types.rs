//! Wire types shared by the filter pipeline, the event reporter and the relay receiver.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Header attached to every response the filter crafts itself.
pub const REJECTED_BY_HEADER: &str = "x-rejected-by";

/// Value of [`REJECTED_BY_HEADER`].
pub const REJECTED_BY_VALUE: &str = "patroneos";

/// Path relay nodes accept events on, and that filter nodes refuse with `403`.
pub const RELAY_PATH: &str = "/patroneos/fail2ban-relay";

/// Path of the live configuration endpoint.
pub const CONFIG_PATH: &str = "/patroneos/config";

/// Message carried by success events.
pub const SUCCESS_MESSAGE: &str = "SUCCESS";

/// Decodes `null` as the type's default, so `"actions": null` behaves like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One operation inside a transaction.
///
/// Only `code` and the length of `data` take part in rule evaluation; everything else is
/// carried so the payload decodes the same way the node would see it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Contract account the action is dispatched to.
    #[serde(default, deserialize_with = "nullable")]
    pub code: String,

    /// Action name within the contract.
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub action_type: String,

    #[serde(default, deserialize_with = "nullable")]
    pub recipients: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub authorization: Vec<Value>,

    /// Serialized action payload. Opaque to the filter; only its byte length matters.
    #[serde(default, deserialize_with = "nullable")]
    pub data: String,
}

/// One unit of chain work as submitted through `push_transaction(s)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub ref_block_num: Value,

    #[serde(default)]
    pub ref_block_prefix: Value,

    #[serde(default, deserialize_with = "nullable")]
    pub expiration: String,

    #[serde(default, deserialize_with = "nullable")]
    pub scope: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub actions: Vec<Action>,

    #[serde(default, deserialize_with = "nullable")]
    pub signatures: Vec<String>,

    #[serde(default, deserialize_with = "nullable")]
    pub authorizations: Vec<Value>,
}

/// Outcome record sent from a filter to every relay endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayEvent {
    /// Originating client host as seen by the filter.
    pub host: String,
    pub success: bool,
    /// `SUCCESS` or one of the [`RejectReason`] codes.
    pub message: String,
}

impl RelayEvent {
    #[must_use]
    pub fn success(host: impl Into<String>) -> Self {
        Self { host: host.into(), success: true, message: SUCCESS_MESSAGE.to_string() }
    }

    #[must_use]
    pub fn failure(host: impl Into<String>, reason: RejectReason) -> Self {
        Self { host: host.into(), success: false, message: reason.as_str().to_string() }
    }
}

/// Body of every error response crafted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub message: String,
    pub code: u16,
}

impl ErrorMessage {
    #[must_use]
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self { message: message.into(), code }
    }
}

/// Reason codes reported to relays and returned to rejected clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RejectReason {
    /// Non-empty body that is not syntactically valid JSON.
    #[error("INVALID_JSON")]
    InvalidJson,

    /// Batch holds more transactions than `maxTransactions`.
    #[error("TOO_MANY_TRANSACTIONS")]
    TooManyTransactions,

    /// An action's `data` is longer than `maxTransactionSize` bytes.
    #[error("INVALID_TRANSACTION_SIZE")]
    InvalidTransactionSize,

    /// A transaction carries more than `maxSignatures` signatures.
    #[error("INVALID_NUMBER_SIGNATURES")]
    InvalidNumberSignatures,

    /// An action targets a blacklisted contract.
    #[error("BLACKLISTED_CONTRACT")]
    BlacklistedContract,

    /// Valid JSON that does not decode into transactions.
    #[error("PARSE_ERROR")]
    ParseError,

    /// The node answered a forwarded request with a non-200 status.
    #[error("TRANSACTION_FAILED")]
    TransactionFailed,
}

impl RejectReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidJson => "INVALID_JSON",
            Self::TooManyTransactions => "TOO_MANY_TRANSACTIONS",
            Self::InvalidTransactionSize => "INVALID_TRANSACTION_SIZE",
            Self::InvalidNumberSignatures => "INVALID_NUMBER_SIGNATURES",
            Self::BlacklistedContract => "BLACKLISTED_CONTRACT",
            Self::ParseError => "PARSE_ERROR",
            Self::TransactionFailed => "TRANSACTION_FAILED",
        }
    }

    /// Client-facing error body for a request halted by the pipeline.
    #[must_use]
    pub fn to_error_message(&self) -> ErrorMessage {
        ErrorMessage::new(self.as_str(), 400)
    }
}
