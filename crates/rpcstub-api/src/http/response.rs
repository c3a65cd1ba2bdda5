//! Response builder consumed once by the transport.

use axum::{
    http::{
        HeaderName, HeaderValue, StatusCode,
        header::{CONTENT_TYPE, WWW_AUTHENTICATE},
    },
    response::{IntoResponse, Response},
};

use crate::http::constants::{
    BAD_AUTH_BODY, BAD_REQUEST_BODY, CONNECT_TEST_BODY, CONTENT_TYPE_HTML, CONTENT_TYPE_JSON,
    CONTENT_TYPE_PLAIN,
};

/// Status, extra headers, content type and body of one reply.
///
/// `Content-Length` is not stored; the transport computes it from the body.
#[derive(Debug, Clone)]
pub(crate) struct StubResponse {
    status: StatusCode,
    headers: Vec<(HeaderName, HeaderValue)>,
    content_type: &'static str,
    body: String,
}

impl Default for StubResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            content_type: CONTENT_TYPE_JSON,
            body: String::new(),
        }
    }
}

impl StubResponse {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) const fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub(crate) fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.push((name, value));
        self
    }

    pub(crate) const fn content_type(mut self, content_type: &'static str) -> Self {
        self.content_type = content_type;
        self
    }

    pub(crate) fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// 401 with the Basic challenge.
    pub(crate) fn bad_auth(challenge: HeaderValue) -> Self {
        Self::new()
            .status(StatusCode::UNAUTHORIZED)
            .header(WWW_AUTHENTICATE, challenge)
            .content_type(CONTENT_TYPE_HTML)
            .body(BAD_AUTH_BODY)
    }

    /// 405 for any path/method combination other than `POST` to the RPC path.
    pub(crate) fn bad_request() -> Self {
        Self::new()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .content_type(CONTENT_TYPE_HTML)
            .body(BAD_REQUEST_BODY)
    }

    /// 200 `OK <suffix>` for the reachability probe.
    pub(crate) fn connection_test(suffix: &str) -> Self {
        Self::new()
            .content_type(CONTENT_TYPE_PLAIN)
            .body(format!("{CONNECT_TEST_BODY} {suffix}"))
    }

    #[cfg(test)]
    pub(crate) fn body_text(&self) -> &str {
        &self.body
    }
}

impl IntoResponse for StubResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        let headers = response.headers_mut();
        for (name, value) in self.headers {
            headers.insert(name, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.content_type));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_ok_and_json() {
        let response = StubResponse::new().body("{}\n").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
    }

    #[test]
    fn bad_auth_carries_challenge() {
        let response =
            StubResponse::bad_auth(HeaderValue::from_static("Basic realm=\"Transmission\""))
                .into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(WWW_AUTHENTICATE),
            Some(&HeaderValue::from_static("Basic realm=\"Transmission\""))
        );
        assert_eq!(
            response.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("text/html; charset=ISO-8859-1"))
        );
    }

    #[test]
    fn connection_test_appends_suffix() {
        let response = StubResponse::connection_test("GET");
        assert_eq!(response.body_text(), "OK GET");
    }

    #[test]
    fn later_content_type_wins() {
        let response = StubResponse::bad_request()
            .content_type(CONTENT_TYPE_JSON)
            .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
    }
}
