//! Response builders shared by the handlers.

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;
use patroneos_core::{
    types::{ErrorMessage, RejectReason, REJECTED_BY_HEADER, REJECTED_BY_VALUE},
    upstream::{UpstreamError, UpstreamResponse},
};

/// An error produced by the gateway itself, tagged so clients can tell it from a node error.
#[must_use]
pub fn gateway_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        [(REJECTED_BY_HEADER, REJECTED_BY_VALUE)],
        Json(ErrorMessage::new(message, status.as_u16())),
    )
        .into_response()
}

/// `400` naming the failed check.
#[must_use]
pub fn rejection(reason: RejectReason) -> Response {
    gateway_error(StatusCode::BAD_REQUEST, reason.as_str())
}

#[must_use]
pub fn upstream_error(error: &UpstreamError) -> Response {
    let status = StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
    gateway_error(status, error.code())
}

/// Copies the node's status, headers and body onto the client response.
#[must_use]
pub fn mirror(upstream: &UpstreamResponse) -> Response {
    let mut response = Response::new(Body::from(upstream.body.clone()));
    *response.status_mut() = upstream.status;

    let headers = response.headers_mut();
    for (name, value) in upstream.mirrored_headers() {
        headers.append(name.clone(), value.clone());
    }
    response
}

/// Maps a failed body read: `413` when the size limit was hit, `400` for anything else
/// (client hang-up, broken chunked encoding).
#[must_use]
pub fn body_error(error: &axum::Error) -> Response {
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        if cause.is::<LengthLimitError>() {
            return gateway_error(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE");
        }
        source = cause.source();
    }
    gateway_error(StatusCode::BAD_REQUEST, "BODY_READ_FAILED")
}

/// Plain error body without the gateway tag, for replies that are not request verdicts.
#[must_use]
pub fn plain_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorMessage::new(message, status.as_u16()))).into_response()
}
