use super::ConfigError;
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Role the process plays, fixed for its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Inspect RPC traffic and forward approved requests to the node.
    #[default]
    #[serde(rename = "filter")]
    Filter,

    /// Receive outcome events from filters and append them to the fail2ban log.
    #[serde(rename = "fail2ban-relay")]
    Fail2banRelay,
}

impl Mode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Fail2banRelay => "fail2ban-relay",
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filter" => Ok(Self::Filter),
            "fail2ban-relay" => Ok(Self::Fail2banRelay),
            other => Err(format!("unknown mode '{other}', expected 'filter' or 'fail2ban-relay'")),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level for the gateway's own crates when `RUST_LOG` is unset.
    pub level: String,

    /// `"json"` or `"pretty"`.
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

/// Process settings outside the exchanged configuration document.
///
/// Loaded from compiled defaults overridden by `PATRONEOS__*` environment variables, using
/// `__` between nested keys (e.g. `PATRONEOS__LOGGING__FORMAT=json`). Command-line flags are
/// applied on top by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSettings {
    pub mode: Mode,

    /// Timeout for one forwarded request, connect to last body byte.
    pub upstream_timeout_seconds: u64,

    /// Timeout for delivering one event to one relay endpoint.
    pub relay_timeout_seconds: u64,

    pub connect_timeout_seconds: u64,

    /// Largest request body accepted before the pipeline runs.
    pub max_body_bytes: usize,

    pub logging: LoggingSettings,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            mode: Mode::Filter,
            upstream_timeout_seconds: 30,
            relay_timeout_seconds: 5,
            connect_timeout_seconds: 5,
            max_body_bytes: 1024 * 1024,
            logging: LoggingSettings::default(),
        }
    }
}

impl RuntimeSettings {
    /// Loads settings from defaults and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Settings`] if an override cannot be deserialized.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("PATRONEOS").separator("__"))
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("mode", defaults.mode.as_str())?
            .set_default("upstream_timeout_seconds", defaults.upstream_timeout_seconds)?
            .set_default("relay_timeout_seconds", defaults.relay_timeout_seconds)?
            .set_default("connect_timeout_seconds", defaults.connect_timeout_seconds)?
            .set_default("max_body_bytes", defaults.max_body_bytes as u64)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .add_source(environment.try_parsing(true))
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero timeouts or an unknown log format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream_timeout_seconds == 0 || self.relay_timeout_seconds == 0 {
            return Err(ConfigError::Invalid("timeouts must be greater than 0".to_string()));
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid("max_body_bytes must be greater than 0".to_string()));
        }

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err(ConfigError::Invalid("logging format must be 'json' or 'pretty'".to_string()));
        }

        Ok(())
    }

    #[must_use]
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    #[must_use]
    pub fn relay_timeout(&self) -> Duration {
        Duration::from_secs(self.relay_timeout_seconds)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}
