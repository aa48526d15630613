//! Live configuration: read, replace, persist.

use crate::mock_infrastructure::{
    body_json, gateway_config, relay_config, transaction, NodeMock, TestGateway,
    PUSH_TRANSACTION,
};
use axum::http::StatusCode;
use patroneos_core::{
    config::{FilterConfig, Mode},
    types::CONFIG_PATH,
};
use serde_json::json;

#[tokio::test]
async fn test_get_returns_active_config() {
    let node = NodeMock::new().await;
    let config = gateway_config(&node, &[]);
    let gateway = TestGateway::filter(config.clone()).await;

    let response = gateway.get(CONFIG_PATH).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["contractBlackList"], json!({"currency": true}));
    assert_eq!(body["maxTransactions"], 2);
    assert_eq!(serde_json::from_value::<FilterConfig>(body).unwrap(), config);
}

#[tokio::test]
async fn test_post_then_get_round_trip() {
    let node = NodeMock::new().await;
    let gateway = TestGateway::filter(gateway_config(&node, &[])).await;

    let mut updated = gateway_config(&node, &["http://relay.internal:8081".to_string()]);
    updated.contract_black_list.insert("eosio.token".to_string(), true);
    updated.max_signatures = 3;
    let response =
        gateway.post(CONFIG_PATH, serde_json::to_string(&updated).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let served: FilterConfig =
        serde_json::from_value(body_json(gateway.get(CONFIG_PATH).await).await).unwrap();
    assert_eq!(served, updated);

    let persisted = std::fs::read(gateway.config_path()).unwrap();
    assert_eq!(FilterConfig::from_slice(&persisted, Mode::Filter).unwrap(), updated);
}

#[tokio::test]
async fn test_update_applies_to_next_request() {
    let mut node = NodeMock::new().await;
    let untouched = node.expect_untouched().await;
    let gateway = TestGateway::filter(gateway_config(&node, &[])).await;

    let mut updated = gateway_config(&node, &[]);
    updated.contract_black_list.insert("tokens".to_string(), true);
    let response = gateway.post(CONFIG_PATH, serde_json::to_string(&updated).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        gateway.post(PUSH_TRANSACTION, transaction("tokens", "abcd", 1).to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "BLACKLISTED_CONTRACT");
    untouched.assert_async().await;
}

#[tokio::test]
async fn test_invalid_update_rejected_and_previous_kept() {
    let node = NodeMock::new().await;
    let original = gateway_config(&node, &[]);
    let gateway = TestGateway::filter(original.clone()).await;
    let on_disk = std::fs::read(gateway.config_path()).unwrap();

    for body in [
        "not json".to_string(),
        json!({"nodeosProtocol": "ftp", "nodeosUrl": "x", "nodeosPort": "1", "listenPort": "2"})
            .to_string(),
        json!({"nodeosProtocol": "http", "nodeosUrl": "x", "nodeosPort": "1", "listenPort": "2",
               "maxSignatures": -1})
        .to_string(),
    ] {
        let response = gateway.post(CONFIG_PATH, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let message = body_json(response).await["message"].as_str().unwrap().to_string();
        assert!(message.starts_with("INVALID_CONFIG: "), "unexpected message: {message}");
    }

    assert_eq!(*gateway.store.snapshot(), original);
    assert_eq!(std::fs::read(gateway.config_path()).unwrap(), on_disk);
}

#[tokio::test]
async fn test_config_served_in_relay_mode() {
    let gateway = TestGateway::relay(relay_config()).await;

    let response = gateway.get(CONFIG_PATH).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["nodeosUrl"], "");
    let log_path = gateway.log_path().to_string_lossy().into_owned();
    assert_eq!(body["logFileLocation"], log_path);
}

#[tokio::test]
async fn test_relay_accepts_update_without_node_address() {
    let gateway = TestGateway::relay(relay_config()).await;
    let log_path = gateway.log_path().to_string_lossy().into_owned();

    let update = json!({"listenPort": "9090", "logFileLocation": log_path});
    let response = gateway.post(CONFIG_PATH, update.to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(gateway.store.snapshot().listen_port, "9090");
    assert!(gateway.store.snapshot().nodeos_url.is_empty());
}

#[tokio::test]
async fn test_relay_rejects_update_without_log_location() {
    let gateway = TestGateway::relay(relay_config()).await;
    let before = gateway.store.snapshot();

    let response = gateway.post(CONFIG_PATH, json!({"listenPort": "9090"}).to_string()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(gateway.store.snapshot(), before);
}
