//! Shared state handed to every handler.

use rpcstub_telemetry::Metrics;

use crate::http::auth::BasicAuthGuard;
use crate::http::session::SessionGuard;
use crate::rpc::MethodDispatcher;

/// Read-only after construction; shared behind an `Arc`.
pub(crate) struct ApiState {
    pub(crate) auth: BasicAuthGuard,
    pub(crate) session: SessionGuard,
    pub(crate) dispatcher: MethodDispatcher,
    pub(crate) telemetry: Metrics,
}
