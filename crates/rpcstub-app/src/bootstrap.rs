//! Boot sequence: configuration, logging, fixtures, then the server.

use std::future::Future;
use std::sync::Arc;

use rpcstub_api::{ReadinessNotifier, StubServer};
use rpcstub_config::{LogFormatSetting, StubConfig};
use rpcstub_fixtures::FixtureStore;
use rpcstub_telemetry::{GlobalContextGuard, LogFormat, LoggingConfig, Metrics, init_logging};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::notifier::StartupNotifier;

/// Everything the boot sequence needs, resolved up front.
pub struct BootstrapDependencies {
    config: StubConfig,
    fixtures: Arc<FixtureStore>,
    telemetry: Metrics,
}

impl BootstrapDependencies {
    /// Resolve dependencies from `RPCSTUB_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, fixtures or metrics cannot be set up.
    pub fn from_env() -> AppResult<Self> {
        let config = StubConfig::from_env().map_err(|err| AppError::config("config.from_env", err))?;
        Self::from_config(config)
    }

    /// Resolve dependencies for an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if fixtures or metrics cannot be set up.
    pub fn from_config(config: StubConfig) -> AppResult<Self> {
        config
            .validate()
            .map_err(|err| AppError::config("config.validate", err))?;
        let fixtures = match &config.fixture_dir {
            Some(dir) => FixtureStore::load_from_dir(dir),
            None => FixtureStore::embedded(),
        }
        .map_err(|err| AppError::fixtures("fixtures.load", err))?;
        let telemetry =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;

        Ok(Self {
            config,
            fixtures: Arc::new(fixtures),
            telemetry,
        })
    }

    /// Configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &StubConfig {
        &self.config
    }

    /// Metrics registry the server will record into.
    #[must_use]
    pub const fn telemetry(&self) -> &Metrics {
        &self.telemetry
    }
}

/// Entry point for the binary: load configuration, install logging and serve
/// until Ctrl-C.
///
/// # Errors
///
/// Returns an error if startup fails or the server terminates unexpectedly.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    init_logging(&logging_config(&dependencies.config))
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;
    let notifier = StartupNotifier::new(dependencies.config.ready_file.clone());
    run_app_with(dependencies, notifier, shutdown_signal()).await
}

/// Boot sequence over injected dependencies, notifier and shutdown signal.
///
/// # Errors
///
/// Returns an error if the server cannot be built or bound, or terminates
/// unexpectedly.
pub async fn run_app_with<N, F>(
    dependencies: BootstrapDependencies,
    notifier: N,
    shutdown: F,
) -> AppResult<()>
where
    N: ReadinessNotifier,
    F: Future<Output = ()> + Send + 'static,
{
    let BootstrapDependencies {
        config,
        fixtures,
        telemetry,
    } = dependencies;
    let _context = GlobalContextGuard::new(&config.server_name);
    info!(
        fixtures = %config
            .fixture_dir
            .as_ref()
            .map_or_else(|| "bundled".to_string(), |dir| dir.display().to_string()),
        "rpc stub bootstrap starting"
    );

    let server = StubServer::new(&config, fixtures, telemetry)
        .map_err(|err| AppError::api_server("stub.new", err))?;
    let addr = config.socket_addr();
    let bound = server
        .bind(addr)
        .await
        .map_err(|err| AppError::api_server("stub.bind", err))?;

    bound
        .serve_with_shutdown(notifier, shutdown)
        .await
        .map_err(|err| AppError::api_server("stub.serve", err))?;
    info!("rpc stub shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for ctrl-c; serving until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

fn logging_config(config: &StubConfig) -> LoggingConfig<'_> {
    LoggingConfig {
        level: &config.log_level,
        format: match config.log_format {
            LogFormatSetting::Auto => LogFormat::infer(),
            LogFormatSetting::Json => LogFormat::Json,
            LogFormatSetting::Pretty => LogFormat::Pretty,
        },
        ..LoggingConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn logging_config_follows_settings() {
        let config = StubConfig {
            log_level: "debug".to_string(),
            log_format: LogFormatSetting::Json,
            ..StubConfig::default()
        };
        let logging = logging_config(&config);
        assert_eq!(logging.level, "debug");
        assert_eq!(logging.format, LogFormat::Json);

        let auto = StubConfig::default();
        assert_eq!(logging_config(&auto).format, LogFormat::infer());
    }

    #[test]
    fn missing_fixture_dir_is_reported() {
        let config = StubConfig {
            fixture_dir: Some(PathBuf::from("/definitely/not/here")),
            ..StubConfig::default()
        };
        let result = BootstrapDependencies::from_config(config);
        assert!(matches!(
            result,
            Err(AppError::Fixtures {
                operation: "fixtures.load",
                ..
            })
        ));
    }

    #[test]
    fn invalid_config_is_reported() {
        let config = StubConfig {
            username: "a:b".to_string(),
            ..StubConfig::default()
        };
        assert!(matches!(
            BootstrapDependencies::from_config(config),
            Err(AppError::Config {
                operation: "config.validate",
                ..
            })
        ));
    }
}
