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

//! Startup configuration for the RPC stub.
//!
//! Layout: `defaults.rs` (protocol constants), `model.rs` (`StubConfig` and
//! environment overrides), `error.rs` (validation failures).

pub mod defaults;
pub mod error;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use model::{LogFormatSetting, StubConfig};
