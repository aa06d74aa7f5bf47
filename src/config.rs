//! Configuration loading and constants.
//!
//! The service is configured almost entirely through defaults. The listen address
//! comes from the command line, the readiness target from the environment, and an
//! optional TOML file can tune everything else. `AppConfig` is the root struct.

use const_format::formatcp;
use serde::Deserialize;
use std::fmt;
use std::path::Path;

// =============================================================================
// Listener
// =============================================================================

/// Default listen address: all interfaces, port 8080
pub const DEFAULT_LISTEN_ADDRESS: &str = ":8080";

/// Hosts tried, in order, when the listen address omits one (":8080").
/// `[::]` is dual-stack on Linux; IPv4-only hosts fall back to `0.0.0.0`.
pub const WILDCARD_HOSTS: &[&str] = &["[::]", "0.0.0.0"];

// =============================================================================
// Readiness Probe
// =============================================================================

/// Environment variable holding the URL probed by `/ready`
pub const READINESS_LINK_ENV: &str = "link";

/// Probe target used when the environment variable is unset or empty
pub const DEFAULT_READINESS_LINK: &str = "https://google.com";

// =============================================================================
// Background Emitters
// =============================================================================

/// Pause between counter increments
pub const COUNTER_INTERVAL_MS: u64 = 1000;

/// Pause between gauge steps (100 steps make one ~1s sawtooth)
pub const GAUGE_STEP_MS: u64 = 10;

/// Highest value the gauge sawtooth reaches before wrapping to 0
pub const GAUGE_MAX: u32 = 99;

// =============================================================================
// HTTP Response Bodies
// =============================================================================

pub const ROOT_BODY: &str = "Hello world!";
pub const HEALTH_BODY: &str = "{Status: OK}";
pub const READY_BODY: &str = "{Status: Ready}";

/// Cache-Control for probe and scrape endpoints, which must never be cached
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Logging
// =============================================================================

const CRATE_TARGET: &str = "sample_workload";

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info,tower_http=info", CRATE_TARGET);

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Seconds in-flight requests get to finish after a shutdown signal
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings
    pub http: HttpConfig,
    /// Readiness probe settings
    pub readiness: ReadinessConfig,
    /// Background emitter pacing
    pub emitters: EmitterConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub listen_address: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReadinessConfig {
    /// Fallback target when the environment variable is missing
    pub default_link: String,
    /// Name of the environment variable read on every probe
    pub env_key: String,
    /// Upper bound on the outbound request. Unset means wait indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            default_link: DEFAULT_READINESS_LINK.to_string(),
            env_key: READINESS_LINK_ENV.to_string(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub counter_interval_ms: u64,
    pub gauge_step_ms: u64,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            counter_interval_ms: COUNTER_INTERVAL_MS,
            gauge_step_ms: GAUGE_STEP_MS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::Validation(format!(
                "unknown log format '{}', expected 'text' or 'json'",
                other
            ))),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would turn the emitters into busy loops or fail
    /// every readiness check outright.
    ///
    /// The listen address is checked later, once CLI overrides are applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.emitters.counter_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "emitters.counter_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.emitters.gauge_step_ms == 0 {
            return Err(ConfigError::Validation(
                "emitters.gauge_step_ms must be greater than 0".to_string(),
            ));
        }
        if self.readiness.timeout_seconds == Some(0) {
            return Err(ConfigError::Validation(
                "readiness.timeout_seconds must be greater than 0 (omit it to disable the timeout)"
                    .to_string(),
            ));
        }
        self.logging.format.parse::<LogFormat>()?;
        Ok(())
    }
}

/// Address the HTTP server binds to, in `host:port` form.
///
/// Accepts the short `:port` form, which binds every interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenAddress {
    /// `None` for the `:port` form
    host: Option<String>,
    port: u16,
}

impl ListenAddress {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidListenAddress(raw.to_string());

        let (host, port) = raw.trim().rsplit_once(':').ok_or_else(invalid)?;
        let port: u16 = port.parse().map_err(|_| invalid())?;

        // Bracketed IPv6 literal: keep the brackets so the result stays `host:port`
        if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
            return Err(invalid());
        }

        let host = (!host.is_empty()).then(|| host.to_string());

        Ok(Self { host, port })
    }

    /// Host to bind, or the first wildcard host for the `:port` form.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(WILDCARD_HOSTS[0])
    }

    pub fn is_wildcard(&self) -> bool {
        self.host.is_none()
    }

    /// `host:port` strings to try binding, in order.
    pub fn bind_candidates(&self) -> Vec<String> {
        match &self.host {
            Some(host) => vec![format!("{}:{}", host, self.port)],
            None => WILDCARD_HOSTS
                .iter()
                .map(|host| format!("{}:{}", host, self.port))
                .collect(),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host(), self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid listen address '{0}', expected [host]:port")]
    InvalidListenAddress(String),
    #[error("Configuration error: {0}")]
    Validation(String),
}
