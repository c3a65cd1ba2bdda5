//! Session-token (CSRF-style) handshake.
//!
//! # Design
//! - The token is fixed for the life of the process.
//! - Every RPC response advertises it, including the 409 rejection, so a
//!   client can retry with the value it just learned.

use std::fmt;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_SESSION_ID;

/// Why a request's session token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The header was absent.
    Missing,
    /// The header was present but differed from the configured token.
    Mismatch,
}

impl SessionError {
    /// Machine-readable error kind.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Missing | Self::Mismatch => "SESSION_TOKEN_MISMATCH",
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Mismatch => "mismatch",
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("session token mismatch")
    }
}

impl std::error::Error for SessionError {}

/// Holds the fixed token and compares incoming headers against it.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    token: String,
    header_value: HeaderValue,
}

impl SessionGuard {
    /// Guard for `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError::InvalidHeaderValue`] if the token is not a
    /// valid header value.
    pub fn new(token: impl Into<String>) -> ApiServerResult<Self> {
        let token = token.into();
        let header_value =
            HeaderValue::from_str(&token).map_err(|_| ApiServerError::InvalidHeaderValue {
                field: "session_id",
                value: token.clone(),
            })?;
        Ok(Self {
            token,
            header_value,
        })
    }

    /// The configured token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Header name under which the token travels.
    #[must_use]
    pub const fn header_name() -> HeaderName {
        HeaderName::from_static(HEADER_SESSION_ID)
    }

    /// The token as a response header value.
    #[must_use]
    pub const fn header_value(&self) -> &HeaderValue {
        &self.header_value
    }

    /// Byte-exact comparison of the request header against the token.
    ///
    /// # Errors
    ///
    /// Returns the reason the header was refused.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), SessionError> {
        match headers.get(HEADER_SESSION_ID) {
            None => Err(SessionError::Missing),
            Some(value) if value.as_bytes() == self.token.as_bytes() => Ok(()),
            Some(_) => Err(SessionError::Mismatch),
        }
    }

    /// Boolean projection of [`Self::check`].
    #[must_use]
    pub fn is_valid(&self, headers: &HeaderMap) -> bool {
        self.check(headers).is_ok()
    }
}
