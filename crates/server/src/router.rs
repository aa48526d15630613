//! Route tables for the two server roles.
//!
//! ```text
//!   filter mode                          fail2ban-relay mode
//!   ───────────                          ───────────────────
//!   GET|POST /patroneos/config           GET|POST /patroneos/config
//!   *        /patroneos/fail2ban-relay   POST     /patroneos/fail2ban-relay
//!              └─► 403                   POST     /
//!   *        everything else                       └─► append to event log
//!              └─► pipeline ─► node
//! ```

use crate::{handlers, middleware};
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get, post},
    Router,
};
use patroneos_core::{
    config::{ConfigStore, Mode, RuntimeSettings},
    filter::Pipeline,
    relay::{EventReporter, RelayLog},
    types::{CONFIG_PATH, RELAY_PATH},
    upstream::{build_http_client, Forwarder, HttpClientConfig},
};
use std::sync::Arc;
use tracing::info;

/// Shared state of the filter role, built once at startup.
#[derive(Debug, Clone)]
pub struct FilterState {
    pub config: Arc<ConfigStore>,
    pub pipeline: Arc<Pipeline>,
    pub forwarder: Forwarder,
    pub reporter: EventReporter,
    pub max_body_bytes: usize,
}

impl FilterState {
    /// Wires the standard pipeline and one pooled HTTP client shared by the forwarder and
    /// the event reporter.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client cannot be built.
    pub fn new(config: Arc<ConfigStore>, settings: &RuntimeSettings) -> anyhow::Result<Self> {
        let client = build_http_client(&HttpClientConfig {
            connect_timeout: settings.connect_timeout(),
            ..HttpClientConfig::default()
        })?;

        Ok(Self {
            config,
            pipeline: Arc::new(Pipeline::standard()),
            forwarder: Forwarder::new(client.clone(), settings.upstream_timeout()),
            reporter: EventReporter::new(client, settings.relay_timeout()),
            max_body_bytes: settings.max_body_bytes,
        })
    }
}

/// Shared state of the relay role.
#[derive(Debug, Clone)]
pub struct RelayState {
    pub log: Arc<RelayLog>,
}

/// Configuration endpoints, served identically in both roles.
pub fn config_routes(store: Arc<ConfigStore>) -> Router {
    Router::new()
        .route(
            CONFIG_PATH,
            get(handlers::config::get_config).post(handlers::config::update_config),
        )
        .with_state(store)
}

pub fn filter_router(state: FilterState) -> Router {
    let store = Arc::clone(&state.config);

    Router::new()
        .route(RELAY_PATH, any(handlers::relay::reject_relay_request))
        .fallback(handlers::filter::handle_rpc)
        .with_state(state)
        .merge(config_routes(store))
}

pub fn relay_router(state: RelayState, store: Arc<ConfigStore>) -> Router {
    Router::new()
        .route("/", post(handlers::relay::receive_event))
        .route(RELAY_PATH, post(handlers::relay::receive_event))
        .with_state(state)
        .merge(config_routes(store))
}

/// Body size limit for extracted bodies and request ids, outermost first: set id, propagate
/// id, limit. The RPC fallback reads its raw body against the same limit itself.
pub fn with_common_layers(router: Router, max_body_bytes: usize) -> Router {
    let (set_request_id, propagate_request_id) = middleware::request_id_layers();

    router
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(propagate_request_id)
        .layer(set_request_id)
}

/// Builds the application for the configured role.
///
/// # Errors
///
/// Fails if the HTTP client cannot be built (filter) or the event log cannot be opened
/// (relay).
pub async fn build_app(settings: &RuntimeSettings, store: Arc<ConfigStore>) -> anyhow::Result<Router> {
    let router = match settings.mode {
        Mode::Filter => {
            let state = FilterState::new(store, settings)?;
            info!(stages = ?state.pipeline.stage_names(), "filter pipeline ready");
            filter_router(state)
        }
        Mode::Fail2banRelay => {
            let location = store.snapshot().log_file_location.clone();
            anyhow::ensure!(
                !location.is_empty(),
                "logFileLocation must be set when running as a fail2ban relay"
            );
            let log = RelayLog::open(&location)
                .await
                .with_context(|| format!("failed to open relay log {location}"))?;
            info!(path = %location, "relay log opened");
            relay_router(RelayState { log: Arc::new(log) }, store)
        }
    };

    Ok(with_common_layers(router, settings.max_body_bytes))
}
