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

//! Telemetry primitives shared across the rpcstub workspace.
//!
//! This crate centralises logging, metrics, and request-scoped tracing helpers so the
//! stub server and its bootstrap share one observability story.

pub mod context;
pub mod error;
pub mod init;
pub mod metrics;
pub mod request;

pub use context::{GlobalContextGuard, RequestContext};
pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
pub use metrics::{Metrics, MetricsSnapshot};
pub use request::{
    HEADER_REQUEST_ID, propagate_request_id_layer, record_response, request_id_of, request_span,
    set_request_id_layer,
};
