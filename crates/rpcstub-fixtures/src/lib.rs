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

//! Fixture documents served by the RPC stub.
//!
//! Layout: `kind.rs` (fixture identifiers), `store.rs` (loading and
//! per-response rendering), `error.rs` (typed load failures).

pub mod error;
pub mod kind;
pub mod store;

pub use error::{FixtureError, FixtureResult};
pub use kind::FixtureKind;
pub use store::FixtureStore;
