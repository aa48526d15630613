//! Mock infrastructure for driving the gateway without a real node.
//!
//! - [`NodeMock`]: mockito server answering as a nodeos chain API
//! - [`RelayMock`]: mockito server receiving relay events
//! - [`TestGateway`]: a built application with its temporary config directory
//!
//! ```ignore
//! let mut node = NodeMock::new().await;
//! let _push = node.accept_push();
//! let gateway = TestGateway::filter(gateway_config(&node, &[])).await;
//! let response = gateway.post("/v1/chain/push_transaction", body).await;
//! ```

pub mod node_mock;

pub use node_mock::{wait_until_matched, NodeMock, RelayMock, PUSH_TRANSACTION};
pub use test_helpers::*;
