//! # Design
//!
//! - One crate-level error for building, binding and serving the stub.
//! - Messages are constant; context lives in structured fields.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::net::SocketAddr;

/// Result alias for stub server operations.
pub type ApiServerResult<T> = std::result::Result<T, ApiServerError>;

/// Errors raised while building, binding or serving the stub.
#[derive(Debug)]
pub enum ApiServerError {
    /// A configured value cannot be sent as an HTTP header.
    InvalidHeaderValue {
        /// Configuration field the value came from.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// Binding the listener failed.
    Bind {
        /// Address attempted.
        addr: SocketAddr,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The bound listener could not report its address.
    LocalAddr {
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Serving failed after startup.
    Serve {
        /// Underlying IO error.
        source: std::io::Error,
    },
}

impl Display for ApiServerError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHeaderValue { .. } => {
                formatter.write_str("configured value is not a valid header value")
            }
            Self::Bind { .. } => formatter.write_str("failed to bind stub listener"),
            Self::LocalAddr { .. } => formatter.write_str("failed to read bound listener address"),
            Self::Serve { .. } => formatter.write_str("stub server terminated unexpectedly"),
        }
    }
}

impl Error for ApiServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidHeaderValue { .. } => None,
            Self::Bind { source, .. } | Self::LocalAddr { source } | Self::Serve { source } => {
                Some(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn display_is_constant_and_sources_are_kept() {
        let addr = SocketAddr::from(([127, 0, 0, 1], 9999));
        let bind = ApiServerError::Bind {
            addr,
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };
        assert_eq!(bind.to_string(), "failed to bind stub listener");
        assert!(bind.source().is_some());

        let invalid = ApiServerError::InvalidHeaderValue {
            field: "session_id",
            value: "bad\n".to_string(),
        };
        assert_eq!(
            invalid.to_string(),
            "configured value is not a valid header value"
        );
        assert!(invalid.source().is_none());

        let serve = ApiServerError::Serve {
            source: io::Error::other("boom"),
        };
        assert_eq!(serve.to_string(), "stub server terminated unexpectedly");
        assert!(serve.source().is_some());
    }
}
