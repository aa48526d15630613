//! Rejection scenarios of the filter pipeline, observed from the HTTP side.
//!
//! Every rejection must be answered locally with a tagged 400 and must never reach the node.

use crate::mock_infrastructure::{
    body_json, gateway_config, transaction, wait_until_matched, NodeMock, RelayMock, TestGateway,
    PEER_IP, PUSH_TRANSACTION,
};
use axum::http::StatusCode;
use patroneos_core::types::{REJECTED_BY_HEADER, REJECTED_BY_VALUE};
use serde_json::json;

async fn assert_rejected(body: String, reason: &str) {
    let mut node = NodeMock::new().await;
    let untouched = node.expect_untouched().await;
    let gateway = TestGateway::filter(gateway_config(&node, &[])).await;

    let response = gateway.post(PUSH_TRANSACTION, body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers().get(REJECTED_BY_HEADER).unwrap(), REJECTED_BY_VALUE);
    assert_eq!(body_json(response).await, json!({"message": reason, "code": 400}));
    untouched.assert_async().await;
}

async fn assert_forwarded(body: String) {
    let mut node = NodeMock::new().await;
    let push = node.accept_push().await;
    let gateway = TestGateway::filter(gateway_config(&node, &[])).await;

    let response = gateway.post(PUSH_TRANSACTION, body).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(REJECTED_BY_HEADER).is_none());
    push.assert_async().await;
}

#[tokio::test]
async fn test_blacklisted_contract_rejected() {
    let body = r#"{"actions":[{"code":"currency","data":"1234567890"}],"signatures":["12345"]}"#;
    assert_rejected(body.to_string(), "BLACKLISTED_CONTRACT").await;
}

#[tokio::test]
async fn test_other_contract_forwarded() {
    let body = r#"{"actions":[{"code":"tokens","data":"1234567890"}],"signatures":["12345"]}"#;
    assert_forwarded(body.to_string()).await;
}

#[tokio::test]
async fn test_transaction_count_limit() {
    let two = json!([transaction("tokens", "abcd", 1), transaction("tokens", "abcd", 1)]);
    assert_forwarded(two.to_string()).await;

    let three = json!([
        transaction("tokens", "abcd", 1),
        transaction("tokens", "abcd", 1),
        transaction("tokens", "abcd", 1)
    ]);
    assert_rejected(three.to_string(), "TOO_MANY_TRANSACTIONS").await;
}

#[tokio::test]
async fn test_action_data_size_limit() {
    let oversized = transaction("tokens", &"a".repeat(100), 1);
    assert_rejected(oversized.to_string(), "INVALID_TRANSACTION_SIZE").await;

    assert_forwarded(transaction("tokens", "abcd", 1).to_string()).await;
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    assert_rejected(r#"{"name"}"#.to_string(), "INVALID_JSON").await;
}

#[tokio::test]
async fn test_signature_limit() {
    assert_rejected(transaction("tokens", "abcd", 2).to_string(), "INVALID_NUMBER_SIGNATURES")
        .await;
    assert_forwarded(transaction("tokens", "abcd", 1).to_string()).await;
}

#[tokio::test]
async fn test_wrong_shape_rejected_as_parse_error() {
    assert_rejected(r#"{"actions": 5}"#.to_string(), "PARSE_ERROR").await;
}

#[tokio::test]
async fn test_empty_and_scalar_bodies_pass_through() {
    assert_forwarded(String::new()).await;
    assert_forwarded("42".to_string()).await;
}

#[tokio::test]
async fn test_count_checked_before_blacklist() {
    let body = json!([
        transaction("currency", "abcd", 1),
        transaction("currency", "abcd", 1),
        transaction("currency", "abcd", 1)
    ]);
    assert_rejected(body.to_string(), "TOO_MANY_TRANSACTIONS").await;
}

#[tokio::test]
async fn test_rejection_reported_to_relay() {
    let mut relay = RelayMock::new().await;
    let event = relay.expect_event(PEER_IP, false, "BLACKLISTED_CONTRACT").await;
    let mut node = NodeMock::new().await;
    let untouched = node.expect_untouched().await;
    let gateway = TestGateway::filter(gateway_config(&node, &[relay.url()])).await;

    let response = gateway.post(PUSH_TRANSACTION, transaction("currency", "x", 1).to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(wait_until_matched(&event).await, "relay never received the failure event");
    event.assert_async().await;
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_listed_contract_refused_whatever_its_value() {
    let mut node = NodeMock::new().await;
    let untouched = node.expect_untouched().await;
    let mut config = gateway_config(&node, &[]);
    config.contract_black_list.insert("currency".to_string(), false);
    let gateway = TestGateway::filter(config).await;

    let response = gateway.post(PUSH_TRANSACTION, transaction("currency", "x", 1).to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "BLACKLISTED_CONTRACT");
    untouched.assert_async().await;
}
