#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Stub application bootstrap wiring.
//!
//! Layout: `bootstrap.rs` (config, logging and server wiring), `notifier.rs`
//! (startup announcement), `error.rs` (application errors).

/// Application bootstrap and environment loading.
pub mod bootstrap;
/// Application-level error type.
pub mod error;
/// Startup announcement for harnesses that launch the binary.
pub mod notifier;

pub use bootstrap::{BootstrapDependencies, run_app, run_app_with, shutdown_signal};
pub use error::{AppError, AppResult};
pub use notifier::StartupNotifier;
