//! # Patroneos Core
//!
//! Business logic for the Patroneos gateway, a filtering reverse proxy placed in front of a
//! nodeos JSON-RPC endpoint.
//!
//! - **[`filter`]**: per-request context, transaction extraction and the ordered rule
//!   pipeline (`INVALID_JSON`, `TOO_MANY_TRANSACTIONS`, `INVALID_TRANSACTION_SIZE`,
//!   `INVALID_NUMBER_SIGNATURES`, `BLACKLISTED_CONTRACT`).
//! - **[`upstream`]**: the shared HTTP client and the forwarder that relays approved requests
//!   to the node.
//! - **[`relay`]**: the event reporter used by filters and the log writer used by relays.
//! - **[`config`]**: the exchanged configuration document, its atomically swappable store,
//!   and process runtime settings.
//! - **[`types`]**: wire types shared by all of the above.
//!
//! HTTP framework adapters live in the `server` crate.
//!
//! ## Roles
//!
//! ```text
//!  client ──► filter ──► nodeos
//!               │
//!               │ {host, success, message}
//!               ▼
//!             relay ──► patroneos.log ──► fail2ban ──► firewall
//! ```

pub mod config;
pub mod filter;
pub mod relay;
pub mod types;
pub mod upstream;
