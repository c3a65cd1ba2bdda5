//! Startup signal for external harnesses.

use std::net::SocketAddr;

/// Told once, after the listener is bound and before the first request is
/// accepted, which address the stub is reachable on.
pub trait ReadinessNotifier: Send + Sync {
    /// Called with the bound address.
    fn server_ready(&self, addr: SocketAddr);
}

/// Notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ReadinessNotifier for NoopNotifier {
    fn server_ready(&self, _addr: SocketAddr) {}
}

impl<F> ReadinessNotifier for F
where
    F: Fn(SocketAddr) + Send + Sync,
{
    fn server_ready(&self, addr: SocketAddr) {
        self(addr);
    }
}
