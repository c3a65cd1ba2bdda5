//! HTTP tracing helpers for Tower-compatible stacks.
//!
//! # Design
//! - `x-request-id` is generated when absent and echoed back on the response.
//! - One `http.request` span per request; status and latency are recorded on completion.

use std::time::Duration;

use http::{Request, Response};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::Span;

use crate::init::build_sha;

/// Header carrying the per-request identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Factory for the `x-request-id` generator layer.
#[must_use]
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies the inbound `x-request-id` onto the response.
#[must_use]
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Identifier attached to `request`, or an empty string when none was set.
#[must_use]
pub fn request_id_of<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Build the `http.request` span for an inbound request.
#[must_use]
pub fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "http.request",
        method = %request.method(),
        route = %request.uri().path(),
        request_id = %request_id_of(request),
        build_sha = %build_sha(),
        status_code = tracing::field::Empty,
        latency_ms = tracing::field::Empty
    )
}

/// Record the outcome of a request on its span.
pub fn record_response<B>(response: &Response<B>, latency: Duration, span: &Span) {
    span.record("status_code", response.status().as_u16());
    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
    span.record("latency_ms", latency_ms);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_layers_can_be_constructed() {
        let _set_layer = set_request_id_layer();
        let _prop_layer = propagate_request_id_layer();
    }

    #[test]
    fn request_id_is_read_from_header() -> Result<(), http::Error> {
        let request = Request::builder()
            .uri("/transmission/rpc")
            .header(HEADER_REQUEST_ID, "req-9")
            .body(())?;
        assert_eq!(request_id_of(&request), "req-9");

        let bare = Request::builder().uri("/").body(())?;
        assert_eq!(request_id_of(&bare), "");
        Ok(())
    }

    #[test]
    fn span_helpers_accept_requests_and_responses() -> Result<(), http::Error> {
        let request = Request::builder().uri("/test_connection").body(())?;
        let span = request_span(&request);
        let response = Response::builder().status(409).body(())?;
        record_response(&response, Duration::from_millis(3), &span);
        Ok(())
    }
}
