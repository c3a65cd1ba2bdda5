//! # Design
//!
//! - Centralize bootstrap and serve failures behind one error type.
//! - Keep messages constant; record the failing operation as a field.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or validated.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: rpcstub_config::ConfigError,
    },
    /// Telemetry could not be initialised.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: rpcstub_telemetry::TelemetryError,
    },
    /// Fixture documents could not be loaded.
    #[error("fixture loading failed")]
    Fixtures {
        /// Operation identifier.
        operation: &'static str,
        /// Source fixture error.
        source: rpcstub_fixtures::FixtureError,
    },
    /// The stub server failed to build, bind or serve.
    #[error("stub server operation failed")]
    ApiServer {
        /// Operation identifier.
        operation: &'static str,
        /// Source server error.
        source: rpcstub_api::ApiServerError,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: rpcstub_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: rpcstub_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn fixtures(
        operation: &'static str,
        source: rpcstub_fixtures::FixtureError,
    ) -> Self {
        Self::Fixtures { operation, source }
    }

    pub(crate) const fn api_server(
        operation: &'static str,
        source: rpcstub_api::ApiServerError,
    ) -> Self {
        Self::ApiServer { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_are_constant_and_sources_preserved() {
        let err = AppError::config(
            "config.from_env",
            rpcstub_config::ConfigError::InvalidField {
                field: "port",
                value: Some("x".to_string()),
                reason: "not_a_port",
            },
        );
        assert_eq!(err.to_string(), "configuration operation failed");
        assert!(err.source().is_some());

        let err = AppError::api_server(
            "stub.bind",
            rpcstub_api::ApiServerError::LocalAddr {
                source: std::io::Error::other("gone"),
            },
        );
        assert_eq!(err.to_string(), "stub server operation failed");
        assert!(matches!(
            err,
            AppError::ApiServer {
                operation: "stub.bind",
                ..
            }
        ));
    }
}
