//! Default values matching what the reference client test suite expects.

use std::net::{IpAddr, Ipv4Addr};

/// Loopback bind address.
pub const BIND_ADDR: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
/// Listening port.
pub const PORT: u16 = 9999;
/// Product name sent in `Server` and the Basic realm.
pub const SERVER_NAME: &str = "Transmission";
/// Basic-auth user.
pub const USERNAME: &str = "username";
/// Basic-auth password.
pub const PASSWORD: &str = "password";
/// Fixed session token clients must echo back.
pub const SESSION_ID: &str = "dGVzdGhlZHNnZGpraGtkamhha2ZjZ3dlODN3aXVkc2hhZm4n";
/// Log level when neither `RUST_LOG` nor `RPCSTUB_LOG_LEVEL` is set.
pub const LOG_LEVEL: &str = "info";
