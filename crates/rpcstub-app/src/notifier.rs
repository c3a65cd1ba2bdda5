//! Startup announcement.
//!
//! # Design
//! - Prints `READY <addr>` on stdout; logs go to stderr, so harnesses can read
//!   the first stdout line.
//! - Optionally writes the bound address to a file for harnesses that poll.

use std::fs;
use std::io::{self, Write as _};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use rpcstub_api::ReadinessNotifier;
use tracing::{error, info};

/// Prefix of the readiness line printed on stdout.
pub const READY_PREFIX: &str = "READY";

/// Announces the bound address on stdout and, when configured, in a file.
#[derive(Debug, Clone, Default)]
pub struct StartupNotifier {
    ready_file: Option<PathBuf>,
}

impl StartupNotifier {
    /// Notifier that also writes the address to `ready_file` when set.
    #[must_use]
    pub const fn new(ready_file: Option<PathBuf>) -> Self {
        Self { ready_file }
    }

    /// Line written to stdout for `addr`.
    #[must_use]
    pub fn ready_line(addr: SocketAddr) -> String {
        format!("{READY_PREFIX} {addr}")
    }
}

impl ReadinessNotifier for StartupNotifier {
    fn server_ready(&self, addr: SocketAddr) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}", Self::ready_line(addr)).and_then(|()| stdout.flush())
        {
            error!(error = %err, "failed to announce readiness on stdout");
        }

        if let Some(path) = &self.ready_file {
            match write_ready_file(path, addr) {
                Ok(()) => info!(path = %path.display(), "readiness file written"),
                Err(err) => {
                    error!(error = %err, path = %path.display(), "failed to write readiness file");
                }
            }
        }
    }
}

fn write_ready_file(path: &Path, addr: SocketAddr) -> io::Result<()> {
    // The file is either absent or holds the complete address.
    let staging = path.with_extension("tmp");
    fs::write(&staging, format!("{addr}\n"))?;
    fs::rename(&staging, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_line_names_the_address() {
        let addr = SocketAddr::from(([127, 0, 0, 1], 9999));
        assert_eq!(StartupNotifier::ready_line(addr), "READY 127.0.0.1:9999");
    }

    #[test]
    fn ready_file_receives_address() -> io::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("stub.ready");
        let addr = SocketAddr::from(([127, 0, 0, 1], 4321));

        StartupNotifier::new(Some(path.clone())).server_ready(addr);

        assert_eq!(fs::read_to_string(&path)?, "127.0.0.1:4321\n");
        assert!(!path.with_extension("tmp").exists());
        Ok(())
    }

    #[test]
    fn unwritable_ready_file_is_not_fatal() {
        let path = PathBuf::from("/nonexistent-dir/for/stub.ready");
        StartupNotifier::new(Some(path.clone())).server_ready(SocketAddr::from(([127, 0, 0, 1], 1)));
        assert!(!path.exists());
    }
}
