//! Event flow between filter and relay nodes.
//!
//! Filters report every decision through the [`EventReporter`]; relays receive those events
//! and append them to the [`RelayLog`] that fail2ban watches.

pub mod log_writer;
pub mod reporter;

pub use log_writer::{format_line, RelayLog};
pub use reporter::{relay_url, Delivery, EventReporter};
