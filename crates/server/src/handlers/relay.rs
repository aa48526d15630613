use crate::{response, router::RelayState};
use axum::{extract::State, http::StatusCode, response::Response};
use bytes::Bytes;
use patroneos_core::types::RelayEvent;
use tracing::{error, info, warn};

const FILTER_MODE_RELAY_MESSAGE: &str = "Patroneos cannot receive fail2ban relay requests when \
                                         running in filter mode. Please check your config.";

/// Receives one event from a filter and appends it to the fail2ban log.
///
/// A malformed event is dropped with a warning and still answered `200`: the sender has
/// nothing useful to do with an error. Only a failed write is reported back.
pub async fn receive_event(State(state): State<RelayState>, body: Bytes) -> StatusCode {
    let event: RelayEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "dropping malformed relay event");
            return StatusCode::OK;
        }
    };

    info!(host = %event.host, success = event.success, message = %event.message, "relay event");

    match state.log.append(&event).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            error!(error = %e, path = %state.log.path().display(), "failed to append relay event");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// A filter was pointed at another filter instead of a relay.
pub async fn reject_relay_request() -> Response {
    warn!("relay request received in filter mode");
    response::plain_error(StatusCode::FORBIDDEN, FILTER_MODE_RELAY_MESSAGE)
}
