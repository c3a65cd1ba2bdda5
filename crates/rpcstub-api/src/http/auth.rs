//! HTTP Basic authentication for everything except the reachability probe.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose};
use rpcstub_telemetry::RequestContext;
use tracing::warn;

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::response::StubResponse;
use crate::state::ApiState;

const BASIC_PREFIX: &str = "Basic ";

/// Result of inspecting an `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials matched the configured pair.
    Authenticated,
    /// No `Authorization` header was sent.
    Missing,
    /// A scheme other than `Basic` was used.
    WrongScheme,
    /// The credential segment was not valid base64 or UTF-8.
    Malformed,
    /// Credentials decoded but did not match.
    Rejected,
}

impl AuthOutcome {
    /// Stable label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authenticated => "authenticated",
            Self::Missing => "missing",
            Self::WrongScheme => "wrong_scheme",
            Self::Malformed => "malformed",
            Self::Rejected => "rejected",
        }
    }
}

/// Validates Basic credentials against one fixed username/password pair.
#[derive(Debug, Clone)]
pub struct BasicAuthGuard {
    expected: String,
    challenge: HeaderValue,
}

impl BasicAuthGuard {
    /// Guard accepting `username:password`, challenging with `realm`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError::InvalidHeaderValue`] when `realm` cannot be
    /// carried in a `WWW-Authenticate` header.
    pub fn new(username: &str, password: &str, realm: &str) -> ApiServerResult<Self> {
        let raw = format!("Basic realm=\"{realm}\"");
        let challenge =
            HeaderValue::from_str(&raw).map_err(|_| ApiServerError::InvalidHeaderValue {
                field: "server_name",
                value: realm.to_string(),
            })?;
        Ok(Self {
            expected: format!("{username}:{password}"),
            challenge,
        })
    }

    /// `WWW-Authenticate` value sent with 401 responses.
    #[must_use]
    pub const fn challenge(&self) -> &HeaderValue {
        &self.challenge
    }

    /// Classify the raw `Authorization` header value.
    #[must_use]
    pub fn check(&self, header: Option<&HeaderValue>) -> AuthOutcome {
        let Some(header) = header else {
            return AuthOutcome::Missing;
        };
        let Ok(raw) = header.to_str() else {
            return AuthOutcome::Malformed;
        };
        let Some(credentials) = raw.strip_prefix(BASIC_PREFIX) else {
            return AuthOutcome::WrongScheme;
        };
        let Some(encoded) = credentials.split_whitespace().next() else {
            return AuthOutcome::Malformed;
        };
        let Ok(decoded) = general_purpose::STANDARD.decode(encoded) else {
            return AuthOutcome::Malformed;
        };
        let Ok(decoded) = String::from_utf8(decoded) else {
            return AuthOutcome::Malformed;
        };
        if decoded == self.expected {
            AuthOutcome::Authenticated
        } else {
            AuthOutcome::Rejected
        }
    }

    /// Boolean projection of [`Self::check`].
    #[must_use]
    pub fn is_authenticated(&self, header: Option<&HeaderValue>) -> bool {
        self.check(header) == AuthOutcome::Authenticated
    }
}

pub(crate) async fn require_basic_auth(
    State(state): State<Arc<ApiState>>,
    req: Request,
    next: Next,
) -> Response {
    match reject_unauthenticated(&state, req.headers(), req.uri().path()) {
        Some(rejection) => rejection,
        None => next.run(req).await,
    }
}

/// The 401 reply when `headers` lack valid credentials, `None` otherwise.
pub(crate) fn reject_unauthenticated(
    state: &ApiState,
    headers: &HeaderMap,
    path: &str,
) -> Option<Response> {
    let outcome = state.auth.check(headers.get(AUTHORIZATION));
    if outcome == AuthOutcome::Authenticated {
        return None;
    }

    state.telemetry.inc_auth_failure();
    let context = RequestContext::current();
    warn!(
        reason = outcome.as_str(),
        path,
        request_id = context.as_ref().map(RequestContext::request_id),
        route = context.as_ref().map(RequestContext::route),
        "rejected request without valid credentials"
    );
    Some(StubResponse::bad_auth(state.auth.challenge().clone()).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::session::SessionGuard;
    use crate::rpc::MethodDispatcher;
    use rpcstub_telemetry::Metrics;

    fn guard() -> BasicAuthGuard {
        BasicAuthGuard::new("username", "password", "Transmission").expect("valid realm")
    }

    fn basic(raw: &str) -> HeaderValue {
        let encoded = general_purpose::STANDARD.encode(raw);
        HeaderValue::from_str(&format!("Basic {encoded}")).expect("valid header")
    }

    #[test]
    fn matching_credentials_authenticate() {
        let guard = guard();
        assert_eq!(
            guard.check(Some(&basic("username:password"))),
            AuthOutcome::Authenticated
        );
        assert!(guard.is_authenticated(Some(&basic("username:password"))));
    }

    #[test]
    fn wrong_credentials_are_rejected() {
        let guard = guard();
        assert_eq!(
            guard.check(Some(&basic("username:wrong"))),
            AuthOutcome::Rejected
        );
        assert_eq!(
            guard.check(Some(&basic("username:password "))),
            AuthOutcome::Rejected
        );
    }

    #[test]
    fn missing_and_foreign_schemes_fail_closed() {
        let guard = guard();
        assert_eq!(guard.check(None), AuthOutcome::Missing);
        assert_eq!(
            guard.check(Some(&HeaderValue::from_static("Bearer abc"))),
            AuthOutcome::WrongScheme
        );
        assert_eq!(
            guard.check(Some(&HeaderValue::from_static("basic dXNlcm5hbWU6cGFzc3dvcmQ="))),
            AuthOutcome::WrongScheme
        );
    }

    #[test]
    fn undecodable_credentials_are_malformed() {
        let guard = guard();
        assert_eq!(
            guard.check(Some(&HeaderValue::from_static("Basic !!!not-base64!!!"))),
            AuthOutcome::Malformed
        );
        assert_eq!(
            guard.check(Some(&HeaderValue::from_static("Basic "))),
            AuthOutcome::Malformed
        );
        let invalid_utf8 = general_purpose::STANDARD.encode([0xff_u8, 0xfe, 0x3a]);
        let header = HeaderValue::from_str(&format!("Basic {invalid_utf8}")).expect("header");
        assert_eq!(guard.check(Some(&header)), AuthOutcome::Malformed);
    }

    #[test]
    fn challenge_names_the_realm() {
        assert_eq!(
            guard().challenge(),
            &HeaderValue::from_static("Basic realm=\"Transmission\"")
        );
        assert!(matches!(
            BasicAuthGuard::new("u", "p", "bad\nrealm"),
            Err(ApiServerError::InvalidHeaderValue { .. })
        ));
    }

    #[tokio::test]
    async fn rejection_runs_inside_request_context() {
        let state = ApiState {
            auth: guard(),
            session: SessionGuard::new("token").expect("session"),
            dispatcher: MethodDispatcher::new(),
            telemetry: Metrics::new().expect("metrics"),
        };
        let mut headers = HeaderMap::new();

        let rejected = RequestContext::new("req-1", "/transmission/rpc")
            .scope(async { reject_unauthenticated(&state, &headers, "/transmission/rpc") })
            .await
            .expect("401 without credentials");
        assert_eq!(rejected.status(), axum::http::StatusCode::UNAUTHORIZED);
        assert_eq!(state.telemetry.snapshot().auth_failures_total, 1);

        headers.insert(AUTHORIZATION, basic("username:password"));
        assert!(reject_unauthenticated(&state, &headers, "/").is_none());
        assert_eq!(state.telemetry.snapshot().auth_failures_total, 1);
    }
}
