//! Fixture identifiers.

use std::fmt::{self, Display, Formatter};

/// The three canned documents the stub can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    /// Session statistics snapshot (`session-stats`).
    Stats,
    /// Full torrent list (`torrent-get`).
    Torrents,
    /// Recently-active torrent delta (`torrent-get` with `ids = "recently-active"`).
    RecentlyActive,
}

impl FixtureKind {
    /// All fixture kinds in load order.
    pub const ALL: [Self; 3] = [Self::Stats, Self::Torrents, Self::RecentlyActive];

    /// File name of the fixture inside a fixture directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Stats => "stats.json",
            Self::Torrents => "torrents.json",
            Self::RecentlyActive => "recently_active.json",
        }
    }

    /// Stable label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::Torrents => "torrents",
            Self::RecentlyActive => "recently_active",
        }
    }
}

impl Display for FixtureKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_distinct() {
        let names: Vec<_> = FixtureKind::ALL.iter().map(|kind| kind.file_name()).collect();
        assert_eq!(
            names,
            vec!["stats.json", "torrents.json", "recently_active.json"]
        );
        assert_eq!(FixtureKind::RecentlyActive.to_string(), "recently_active");
    }
}
