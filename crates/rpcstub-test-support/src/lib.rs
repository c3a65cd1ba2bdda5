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

//! Shared helpers for integration suites.
//! Layout: auth.rs (credential headers), server.rs (in-process stub on an ephemeral port).

pub mod auth;
pub mod server;

pub use auth::basic_auth_header;
pub use server::{ChannelNotifier, RunningStub, spawn_default_stub, spawn_stub};
