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

//! Binary entrypoint for the Transmission RPC stub.

use rpcstub_app::{AppResult, run_app};

/// Boots the stub and blocks until Ctrl-C.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
