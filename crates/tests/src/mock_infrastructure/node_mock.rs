//! mockito wrappers for the node and for relay endpoints.

use mockito::{Matcher, Mock, Server, ServerGuard};
use patroneos_core::types::RELAY_PATH;
use serde_json::json;
use std::time::Duration;

pub const PUSH_TRANSACTION: &str = "/v1/chain/push_transaction";

/// Stand-in for the upstream nodeos node.
pub struct NodeMock {
    server: ServerGuard,
}

impl NodeMock {
    pub async fn new() -> Self {
        Self { server: Server::new_async().await }
    }

    /// `host:port` of the mock, split for the `nodeosUrl`/`nodeosPort` config fields.
    #[must_use]
    pub fn host_and_port(&self) -> (String, String) {
        let host_with_port = self.server.host_with_port();
        match host_with_port.rsplit_once(':') {
            Some((host, port)) => (host.to_string(), port.to_string()),
            None => (host_with_port, "80".to_string()),
        }
    }

    /// Accepts any push with a `200` and a transaction id.
    pub async fn accept_push(&mut self) -> Mock {
        self.server
            .mock("POST", PUSH_TRANSACTION)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("x-nodeos", "accepted")
            .with_body(json!({"transaction_id": "8f1c5e"}).to_string())
            .create_async()
            .await
    }

    /// Answers a push with `status` and a nodeos-style error body.
    pub async fn fail_push(&mut self, status: usize) -> Mock {
        self.server
            .mock("POST", PUSH_TRANSACTION)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({"code": status, "message": "Internal Service Error"}).to_string())
            .create_async()
            .await
    }

    /// Fails the test on assert if any POST reaches the node.
    pub async fn expect_untouched(&mut self) -> Mock {
        self.server.mock("POST", Matcher::Any).expect(0).create_async().await
    }

    pub fn server_mut(&mut self) -> &mut ServerGuard {
        &mut self.server
    }
}

/// Stand-in for a relay node receiving events from filters.
pub struct RelayMock {
    server: ServerGuard,
}

impl RelayMock {
    pub async fn new() -> Self {
        Self { server: Server::new_async().await }
    }

    /// Base URL as it appears in `logEndpoints`.
    #[must_use]
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Expects exactly one event with the given outcome.
    pub async fn expect_event(&mut self, host: &str, success: bool, message: &str) -> Mock {
        self.server
            .mock("POST", RELAY_PATH)
            .match_body(Matcher::Json(json!({
                "host": host,
                "success": success,
                "message": message,
            })))
            .with_status(200)
            .expect(1)
            .create_async()
            .await
    }

    /// Fails the test on assert if any event arrives.
    pub async fn expect_silence(&mut self) -> Mock {
        self.server.mock("POST", Matcher::Any).expect(0).create_async().await
    }
}

/// Events are delivered in the background after the response; poll until the mock matched.
pub async fn wait_until_matched(mock: &Mock) -> bool {
    for _ in 0..100 {
        if mock.matched_async().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
