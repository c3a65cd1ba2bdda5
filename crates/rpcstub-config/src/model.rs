//! Typed stub configuration and environment overrides.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};

/// Environment variable prefix shared by every override.
pub const ENV_PREFIX: &str = "RPCSTUB_";

/// Requested log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    /// Pick pretty output for debug builds and JSON for release builds.
    #[default]
    Auto,
    /// Structured JSON lines.
    Json,
    /// Human-readable output.
    Pretty,
}

impl LogFormatSetting {
    /// Parse the textual form used in the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] for unknown formats.
    pub fn parse(raw: &str) -> ConfigResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(Self::Auto),
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(ConfigError::invalid("log_format", raw, "unknown_format")),
        }
    }
}

/// Everything the stub needs to know at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StubConfig {
    /// Address the listener binds to.
    pub bind_addr: IpAddr,
    /// Port the listener binds to; `0` asks the OS for a free port.
    pub port: u16,
    /// Product name used in the `Server` header and the Basic realm.
    pub server_name: String,
    /// Accepted Basic-auth user.
    pub username: String,
    /// Accepted Basic-auth password.
    pub password: String,
    /// Fixed session token.
    pub session_id: String,
    /// Directory holding the fixture documents; bundled fixtures are used when unset.
    pub fixture_dir: Option<PathBuf>,
    /// File that receives the bound address once the listener is ready.
    pub ready_file: Option<PathBuf>,
    /// Default log filter.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormatSetting,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            bind_addr: defaults::BIND_ADDR,
            port: defaults::PORT,
            server_name: defaults::SERVER_NAME.to_string(),
            username: defaults::USERNAME.to_string(),
            password: defaults::PASSWORD.to_string(),
            session_id: defaults::SESSION_ID.to_string(),
            fixture_dir: None,
            ready_file: None,
            log_level: defaults::LOG_LEVEL.to_string(),
            log_format: LogFormatSetting::Auto,
        }
    }
}

impl StubConfig {
    /// Defaults overridden by `RPCSTUB_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an override cannot be parsed or the result fails validation.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden through an arbitrary variable lookup.
    ///
    /// `lookup` receives full variable names (for example `RPCSTUB_PORT`).
    ///
    /// # Errors
    ///
    /// Returns an error when an override cannot be parsed or the result fails validation.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));
        let mut config = Self::default();

        if let Some(raw) = var("BIND_ADDR") {
            config.bind_addr = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("bind_addr", &raw, "not_an_ip_address"))?;
        }
        if let Some(raw) = var("PORT") {
            config.port = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("port", &raw, "not_a_port"))?;
        }
        if let Some(raw) = var("SERVER_NAME") {
            config.server_name = raw;
        }
        if let Some(raw) = var("USERNAME") {
            config.username = raw;
        }
        if let Some(raw) = var("PASSWORD") {
            config.password = raw;
        }
        if let Some(raw) = var("SESSION_ID") {
            config.session_id = raw;
        }
        if let Some(raw) = var("FIXTURE_DIR").filter(|raw| !raw.trim().is_empty()) {
            config.fixture_dir = Some(PathBuf::from(raw));
        }
        if let Some(raw) = var("READY_FILE").filter(|raw| !raw.trim().is_empty()) {
            config.ready_file = Some(PathBuf::from(raw));
        }
        if let Some(raw) = var("LOG_LEVEL") {
            config.log_level = raw;
        }
        if let Some(raw) = var("LOG_FORMAT") {
            config.log_format = LogFormatSetting::parse(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> ConfigResult<()> {
        require_non_empty("server_name", &self.server_name)?;
        require_non_empty("username", &self.username)?;
        require_non_empty("session_id", &self.session_id)?;
        require_non_empty("log_level", &self.log_level)?;

        if self.username.contains(':') {
            return Err(ConfigError::invalid(
                "username",
                &self.username,
                "contains_colon",
            ));
        }
        if !self.session_id.bytes().all(|byte| byte.is_ascii_graphic()) {
            return Err(ConfigError::invalid(
                "session_id",
                &self.session_id,
                "not_a_header_token",
            ));
        }
        if !self
            .server_name
            .bytes()
            .all(|byte| byte.is_ascii_graphic() || byte == b' ')
        {
            return Err(ConfigError::invalid(
                "server_name",
                &self.server_name,
                "not_a_header_value",
            ));
        }
        Ok(())
    }

    /// Socket address the listener binds to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn require_non_empty(field: &'static str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        Err(ConfigError::InvalidField {
            field,
            value: None,
            reason: "empty",
        })
    } else {
        Ok(())
    }
}
