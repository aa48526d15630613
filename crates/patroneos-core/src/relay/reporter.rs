use crate::{
    filter::RequestContext,
    types::{RejectReason, RelayEvent, RELAY_PATH},
};
use reqwest::Client;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Appends the relay path to a base URL unless it is already present.
#[must_use]
pub fn relay_url(endpoint: &str) -> String {
    if endpoint.contains(RELAY_PATH) {
        endpoint.to_string()
    } else {
        format!("{}{RELAY_PATH}", endpoint.trim_end_matches('/'))
    }
}

/// In-flight deliveries of one event, one task per relay endpoint.
///
/// Dropping it detaches the tasks; they still run to completion or timeout.
#[derive(Debug, Default)]
pub struct Delivery {
    handles: Vec<JoinHandle<bool>>,
}

impl Delivery {
    /// Number of endpoints the event was dispatched to.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every delivery and returns how many endpoints accepted the event.
    pub async fn join(self) -> usize {
        let mut delivered = 0;
        for handle in self.handles {
            if matches!(handle.await, Ok(true)) {
                delivered += 1;
            }
        }
        delivered
    }
}

/// Sends outcome events to relay endpoints without holding up the client response.
///
/// Each endpoint gets its own spawned task with its own timeout. Failures are logged and
/// never retried; one unreachable relay does not affect the others.
#[derive(Debug, Clone)]
pub struct EventReporter {
    client: Client,
    timeout: Duration,
}

impl EventReporter {
    #[must_use]
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Records a passed request. Must be called from within a tokio runtime.
    pub fn report_success(&self, ctx: &RequestContext) -> Delivery {
        info!(host = ctx.remote_host(), "Success");
        self.dispatch(&ctx.config().log_endpoints, RelayEvent::success(ctx.remote_host()))
    }

    /// Records a rejected or failed request. Must be called from within a tokio runtime.
    pub fn report_failure(&self, ctx: &RequestContext, reason: RejectReason) -> Delivery {
        warn!(host = ctx.remote_host(), reason = %reason, "Failure");
        self.dispatch(&ctx.config().log_endpoints, RelayEvent::failure(ctx.remote_host(), reason))
    }

    /// Spawns one delivery task per endpoint.
    pub fn dispatch(&self, endpoints: &[String], event: RelayEvent) -> Delivery {
        let handles = endpoints
            .iter()
            .map(|endpoint| {
                let client = self.client.clone();
                let url = relay_url(endpoint);
                let event = event.clone();
                let timeout = self.timeout;
                tokio::spawn(async move { deliver(&client, &url, &event, timeout).await })
            })
            .collect();

        Delivery { handles }
    }
}

async fn deliver(client: &Client, url: &str, event: &RelayEvent, timeout: Duration) -> bool {
    let result = client
        .post(url)
        .json(event)
        .timeout(timeout)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status);

    match result {
        Ok(response) => {
            debug!(endpoint = url, status = response.status().as_u16(), "event delivered");
            true
        }
        Err(e) => {
            warn!(endpoint = url, error = %e, "failed to deliver event to relay");
            false
        }
    }
}
