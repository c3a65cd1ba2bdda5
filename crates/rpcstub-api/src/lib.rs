#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub)]

//! HTTP test double for a Transmission-style JSON RPC endpoint.
//!
//! Layout: `http/` (routing, guards, handlers), `rpc/` (envelope parsing,
//! method dispatch, wire encoding), `readiness.rs` (startup signal),
//! `error.rs` (server errors).

pub mod error;
pub mod http;
pub mod readiness;
pub mod rpc;
mod state;

pub use error::{ApiServerError, ApiServerResult};
pub use http::auth::{AuthOutcome, BasicAuthGuard};
pub use http::constants::{CONNECT_TEST_PATH, HEADER_SESSION_ID, RPC_PATH};
pub use http::router::{BoundServer, StubServer};
pub use http::session::{SessionError, SessionGuard};
pub use readiness::{NoopNotifier, ReadinessNotifier};
pub use rpc::{EnvelopeOutcome, MethodDispatcher, RpcEnvelope, parse_envelope, to_wire_body};
