//! Error types for fixture loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::kind::FixtureKind;

/// Errors raised while loading fixture documents.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("failed to read fixture file")]
    Read {
        /// Fixture being loaded.
        kind: FixtureKind,
        /// Path that was attempted.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// The fixture file was not valid JSON.
    #[error("failed to parse fixture file")]
    Parse {
        /// Fixture being loaded.
        kind: FixtureKind,
        /// Path of the offending document, when loaded from disk.
        path: Option<PathBuf>,
        /// Source serde error.
        source: serde_json::Error,
    },
    /// The fixture parsed but its top-level value is not a JSON object.
    #[error("fixture document must be a JSON object")]
    NotAnObject {
        /// Fixture that failed validation.
        kind: FixtureKind,
    },
}

/// Convenience alias for fixture results.
pub type FixtureResult<T> = Result<T, FixtureError>;
