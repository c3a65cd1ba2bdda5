//! HTTP surface: routing, guards and endpoint handlers.

/// Basic-auth guard and middleware.
pub mod auth;
/// Paths, header names and canned bodies.
pub mod constants;
pub(crate) mod response;
pub(crate) mod rpc;
/// Router construction and server host.
pub mod router;
/// Session-token guard.
pub mod session;
pub(crate) mod telemetry;
