//! In-process stub bound to an ephemeral loopback port.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use rpcstub_api::{
    ApiServerResult, CONNECT_TEST_PATH, RPC_PATH, ReadinessNotifier, StubServer,
};
use rpcstub_config::StubConfig;
use rpcstub_fixtures::FixtureStore;
use rpcstub_telemetry::Metrics;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Readiness notifier that forwards the bound address over a oneshot channel.
pub struct ChannelNotifier {
    sender: Mutex<Option<oneshot::Sender<SocketAddr>>>,
}

impl ChannelNotifier {
    /// Notifier paired with the receiver that will observe the address.
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<SocketAddr>) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Mutex::new(Some(sender)),
            },
            receiver,
        )
    }
}

impl ReadinessNotifier for ChannelNotifier {
    fn server_ready(&self, addr: SocketAddr) {
        if let Ok(mut guard) = self.sender.lock()
            && let Some(sender) = guard.take()
        {
            let _ = sender.send(addr);
        }
    }
}

/// Handle to a stub serving on a background task.
///
/// Dropping the handle stops the server.
pub struct RunningStub {
    addr: SocketAddr,
    config: StubConfig,
    metrics: Metrics,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<ApiServerResult<()>>,
}

impl RunningStub {
    /// Bound address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Configuration the stub was started with (port as requested, not as bound).
    #[must_use]
    pub const fn config(&self) -> &StubConfig {
        &self.config
    }

    /// Metrics registry the stub records into.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// `http://<addr>` without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Absolute URL of the RPC endpoint.
    #[must_use]
    pub fn rpc_url(&self) -> String {
        format!("{}{RPC_PATH}", self.base_url())
    }

    /// Absolute URL of the reachability probe.
    #[must_use]
    pub fn connection_test_url(&self) -> String {
        format!("{}{CONNECT_TEST_PATH}", self.base_url())
    }

    /// Stop accepting connections and wait for the server task to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the server task failed or panicked.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.task
            .await
            .context("stub server task panicked")?
            .context("stub server failed")
    }
}

/// Start a stub with `config`, using the bundled fixtures.
///
/// # Errors
///
/// Returns an error if the stub cannot be built, bound or started.
pub async fn spawn_stub(config: StubConfig) -> Result<RunningStub> {
    let metrics = Metrics::new().context("metrics registry")?;
    let fixtures = Arc::new(FixtureStore::embedded().context("bundled fixtures")?);
    let server = StubServer::new(&config, fixtures, metrics.clone())?;
    let bound = server.bind(config.socket_addr()).await?;

    let (notifier, ready) = ChannelNotifier::channel();
    let (shutdown, stop) = oneshot::channel::<()>();
    let task = tokio::spawn(bound.serve_with_shutdown(notifier, async move {
        let _ = stop.await;
    }));
    let addr = ready.await.context("stub exited before becoming ready")?;

    Ok(RunningStub {
        addr,
        config,
        metrics,
        shutdown,
        task,
    })
}

/// Start a stub with default credentials on an ephemeral loopback port.
///
/// # Errors
///
/// Same as [`spawn_stub`].
pub async fn spawn_default_stub() -> Result<RunningStub> {
    spawn_stub(StubConfig {
        bind_addr: Ipv4Addr::LOCALHOST.into(),
        port: 0,
        ..StubConfig::default()
    })
    .await
}
