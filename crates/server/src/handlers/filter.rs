use super::originating_host;
use crate::{middleware::request_id_of, response, router::FilterState};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::uri::PathAndQuery,
    response::Response,
};
use patroneos_core::{filter::RequestContext, types::RejectReason};
use std::net::SocketAddr;
use tracing::{debug, error, info_span, Instrument};

/// Entry point for every RPC request in filter mode.
///
/// The body is read once; the pipeline and the forwarder share those bytes. Rejections are
/// answered locally. Everything else goes to the node and its answer is mirrored back. Relay
/// events are dispatched in the background and never delay the response.
pub async fn handle_rpc(State(state): State<FilterState>, request: Request) -> Response {
    let peer = request.extensions().get::<ConnectInfo<SocketAddr>>().map(|info| info.0);
    let remote_host = originating_host(request.headers(), peer);
    let span = info_span!("rpc", request_id = %request_id_of(&request), host = %remote_host);

    process(state, request, remote_host).instrument(span).await
}

async fn process(state: FilterState, request: Request, remote_host: String) -> Response {
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, limit = state.max_body_bytes, "request body could not be read");
            return response::body_error(&e);
        }
    };

    let ctx = RequestContext::new(state.config.snapshot(), remote_host, body);

    if let Err(rejection) = state.pipeline.evaluate(&ctx) {
        debug!(stage = rejection.stage, reason = %rejection.reason, "request rejected");
        state.reporter.report_failure(&ctx, rejection.reason);
        return response::rejection(rejection.reason);
    }

    let path_and_query = parts.uri.path_and_query().map_or("/", PathAndQuery::as_str);
    let base_url = ctx.config().upstream_base_url();

    match state.forwarder.forward(&base_url, parts.method, path_and_query, ctx.body().clone()).await
    {
        Ok(upstream) => {
            if upstream.is_success() {
                state.reporter.report_success(&ctx);
            } else {
                state.reporter.report_failure(&ctx, RejectReason::TransactionFailed);
            }
            response::mirror(&upstream)
        }
        Err(e) => {
            error!(error = %e, upstream = %base_url, "Error in executing request");
            response::upstream_error(&e)
        }
    }
}
