//! Endpoint handlers: the RPC endpoint, the reachability probe and the
//! method-not-allowed fallback.

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use crate::http::auth::reject_unauthenticated;
use crate::http::constants::{
    BAD_REQUEST_BODY, BAD_SESSION_BODY, CONTENT_TYPE_HTML, CONTENT_TYPE_JSON,
};
use crate::http::response::StubResponse;
use crate::http::session::SessionGuard;
use crate::rpc::dispatch::no_method_name_response;
use crate::rpc::{EnvelopeOutcome, parse_envelope, to_wire_body};
use crate::state::ApiState;

/// `POST` to the RPC path, after authentication.
///
/// Order: parse the body, attach the session header, enforce the session
/// token, then classify the body. A request target carrying a query string
/// is not the RPC path and gets the 405 page.
pub(crate) async fn rpc(
    State(state): State<Arc<ApiState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if uri.query().is_some() {
        return method_not_allowed().await;
    }
    let outcome = parse_envelope(&body);
    let response = StubResponse::new().header(
        SessionGuard::header_name(),
        state.session.header_value().clone(),
    );

    if let Err(err) = state.session.check(&headers) {
        state.telemetry.inc_session_conflict();
        debug!(
            reason = err.as_str(),
            kind = err.kind(),
            "session token rejected"
        );
        return response
            .status(StatusCode::CONFLICT)
            .content_type(CONTENT_TYPE_HTML)
            .body(BAD_SESSION_BODY)
            .into_response();
    }

    match outcome {
        EnvelopeOutcome::Unparsable => {
            debug!("request body carried no usable envelope");
            response.body(to_wire_body(&no_method_name_response()))
        }
        EnvelopeOutcome::MissingFields => {
            debug!("request envelope missing required members");
            response
                .status(StatusCode::METHOD_NOT_ALLOWED)
                .content_type(CONTENT_TYPE_JSON)
                .body(BAD_REQUEST_BODY)
        }
        EnvelopeOutcome::Parsed(envelope) => {
            let label = state.dispatcher.label_for(&envelope);
            state.telemetry.inc_rpc_call(label);
            info!(method = label, "rpc call");
            response.body(to_wire_body(&state.dispatcher.dispatch(&envelope)))
        }
    }
    .into_response()
}

/// Reachability probe; answers any method without credentials.
///
/// With a query string the target no longer names the probe, so it is
/// treated like any other protected path.
pub(crate) async fn connection_test(
    State(state): State<Arc<ApiState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if uri.query().is_some() {
        return match reject_unauthenticated(&state, &headers, uri.path()) {
            Some(rejection) => rejection,
            None => method_not_allowed().await,
        };
    }
    let suffix = if method == Method::GET || method == Method::HEAD {
        Cow::Borrowed("GET")
    } else {
        String::from_utf8_lossy(&body)
    };
    StubResponse::connection_test(&suffix).into_response()
}

/// Anything other than `POST` to the RPC path, once authenticated.
pub(crate) async fn method_not_allowed() -> Response {
    StubResponse::bad_request().into_response()
}
