//! Axum handlers for both server roles.

pub mod config;
pub mod filter;
pub mod relay;

use axum::http::HeaderMap;
use std::net::SocketAddr;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Address of the client that originated a request.
///
/// The first entry of `X-Forwarded-For` wins when present, so filters behind a load balancer
/// report the real client. Otherwise the peer IP, without port.
#[must_use]
pub fn originating_host(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get(X_FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}
