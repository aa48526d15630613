//! HTTP front end of the Patroneos gateway.
//!
//! Axum adapters around `patroneos_core`: the handlers deal with extraction, status codes and
//! headers, and delegate every decision to the core library. [`router`] assembles the routes
//! for the role selected at startup.

pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod router;

pub use router::{build_app, filter_router, relay_router, FilterState, RelayState};
