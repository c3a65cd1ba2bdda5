//! Fixture loading and per-response rendering.
//!
//! # Design
//! - Documents are loaded once and kept as immutable templates.
//! - Every response is rendered from a fresh copy; the templates never see a caller's tag.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{FixtureError, FixtureResult};
use crate::kind::FixtureKind;

const EMBEDDED_STATS: &str = include_str!("../fixtures/stats.json");
const EMBEDDED_TORRENTS: &str = include_str!("../fixtures/torrents.json");
const EMBEDDED_RECENTLY_ACTIVE: &str = include_str!("../fixtures/recently_active.json");

/// Read-only store of the canned documents served by the stub.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    stats: Value,
    torrents: Value,
    recently_active: Value,
}

impl FixtureStore {
    /// Build a store from already-parsed documents.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::NotAnObject`] when any document is not a JSON object.
    pub fn from_documents(
        stats: Value,
        torrents: Value,
        recently_active: Value,
    ) -> FixtureResult<Self> {
        Ok(Self {
            stats: ensure_object(FixtureKind::Stats, stats)?,
            torrents: ensure_object(FixtureKind::Torrents, torrents)?,
            recently_active: ensure_object(FixtureKind::RecentlyActive, recently_active)?,
        })
    }

    /// Load `stats.json`, `torrents.json` and `recently_active.json` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error naming the fixture and path when a file is missing,
    /// is not valid JSON, or is not a JSON object.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> FixtureResult<Self> {
        let dir = dir.as_ref();
        let stats = load_document(dir, FixtureKind::Stats)?;
        let torrents = load_document(dir, FixtureKind::Torrents)?;
        let recently_active = load_document(dir, FixtureKind::RecentlyActive)?;
        Self::from_documents(stats, torrents, recently_active)
    }

    /// Store built from the fixtures bundled with this crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled documents are corrupt.
    pub fn embedded() -> FixtureResult<Self> {
        let parse = |kind: FixtureKind, raw: &str| {
            serde_json::from_str::<Value>(raw).map_err(|source| FixtureError::Parse {
                kind,
                path: None,
                source,
            })
        };
        Self::from_documents(
            parse(FixtureKind::Stats, EMBEDDED_STATS)?,
            parse(FixtureKind::Torrents, EMBEDDED_TORRENTS)?,
            parse(FixtureKind::RecentlyActive, EMBEDDED_RECENTLY_ACTIVE)?,
        )
    }

    /// Borrow the unmodified template for `kind`.
    #[must_use]
    pub const fn template(&self, kind: FixtureKind) -> &Value {
        match kind {
            FixtureKind::Stats => &self.stats,
            FixtureKind::Torrents => &self.torrents,
            FixtureKind::RecentlyActive => &self.recently_active,
        }
    }

    /// Copy the template for `kind` and stamp the caller's `tag` on the copy.
    #[must_use]
    pub fn render(&self, kind: FixtureKind, tag: &Value) -> Value {
        let mut document = self.template(kind).clone();
        if let Value::Object(map) = &mut document {
            map.insert("tag".to_string(), tag.clone());
        }
        document
    }
}

fn load_document(dir: &Path, kind: FixtureKind) -> FixtureResult<Value> {
    let path = dir.join(kind.file_name());
    let raw = fs::read_to_string(&path).map_err(|source| FixtureError::Read {
        kind,
        path: path.clone(),
        source,
    })?;
    let document = serde_json::from_str(&raw).map_err(|source| FixtureError::Parse {
        kind,
        path: Some(path.clone()),
        source,
    })?;
    debug!(fixture = %kind, path = %path.display(), "loaded fixture");
    Ok(document)
}

fn ensure_object(kind: FixtureKind, document: Value) -> FixtureResult<Value> {
    if document.is_object() {
        Ok(document)
    } else {
        Err(FixtureError::NotAnObject { kind })
    }
}
