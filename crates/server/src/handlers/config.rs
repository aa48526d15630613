use crate::response;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use patroneos_core::config::{ConfigError, ConfigStore};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Returns the active configuration as pretty-printed JSON.
pub async fn get_config(State(store): State<Arc<ConfigStore>>) -> Response {
    match serde_json::to_vec_pretty(&*store.snapshot()) {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode configuration");
            response::plain_error(StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ENCODE_FAILED")
        }
    }
}

/// Replaces the whole configuration with the request body.
///
/// The new document is validated and persisted before it becomes active; requests already in
/// flight finish with the snapshot they started with.
pub async fn update_config(State(store): State<Arc<ConfigStore>>, body: Bytes) -> Response {
    match store.replace(&body).await {
        Ok(_) => {
            info!(path = %store.path().display(), "configuration updated via API");
            StatusCode::OK.into_response()
        }
        Err(e @ (ConfigError::Parse(_) | ConfigError::Invalid(_))) => {
            warn!(error = %e, "configuration update rejected");
            response::plain_error(StatusCode::BAD_REQUEST, format!("INVALID_CONFIG: {e}"))
        }
        Err(e) => {
            error!(error = %e, "configuration update could not be persisted");
            response::plain_error(StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_PERSIST_FAILED")
        }
    }
}
