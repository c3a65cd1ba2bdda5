//! Failures while wiring up logging or the stub's counters.

use prometheus::Error as PrometheusError;
use thiserror::Error;

/// Result alias used across this crate.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Why logging or metrics could not be set up or read.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed in this process.
    #[error("logging is already initialised for this process")]
    LoggingInstall {
        /// Rejection from `tracing-subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
    /// A counter definition was rejected.
    #[error("could not define counter `{name}`")]
    CounterBuild {
        /// Counter name.
        name: &'static str,
        /// Rejection from the registry.
        #[source]
        source: PrometheusError,
    },
    /// A counter could not be added to the stub's registry.
    #[error("could not register counter `{name}`")]
    CounterRegister {
        /// Counter name.
        name: &'static str,
        /// Rejection from the registry.
        #[source]
        source: PrometheusError,
    },
    /// Text exposition of the registry failed.
    #[error("could not render the counter registry")]
    MetricsRender {
        /// Encoder failure.
        #[source]
        source: PrometheusError,
    },
    /// Rendered exposition text was not UTF-8.
    #[error("rendered counters are not utf-8 text")]
    MetricsText {
        /// Conversion failure.
        #[source]
        source: std::string::FromUtf8Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_name_the_counter_and_keep_the_cause() {
        let build = TelemetryError::CounterBuild {
            name: "rpc_calls_total",
            source: PrometheusError::Msg("bad label".to_string()),
        };
        assert_eq!(build.to_string(), "could not define counter `rpc_calls_total`");
        assert_eq!(
            build.source().map(ToString::to_string).as_deref(),
            Some("bad label")
        );

        let register = TelemetryError::CounterRegister {
            name: "auth_failures_total",
            source: PrometheusError::AlreadyReg,
        };
        assert!(register.to_string().contains("auth_failures_total"));
        assert!(register.source().is_some());
    }

    #[test]
    fn render_failures_keep_the_cause() {
        let text = String::from_utf8(vec![0xc3])
            .map_err(|source| TelemetryError::MetricsText { source })
            .err();
        assert!(text.as_ref().and_then(|err| err.source()).is_some());

        let render = TelemetryError::MetricsRender {
            source: PrometheusError::Msg("encode".to_string()),
        };
        assert_eq!(render.to_string(), "could not render the counter registry");
    }
}
