//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub broker: BrokerConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP/WebSocket listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for `/`, `/admin` and other static paths
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Broker behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Destination used by the administrative publish endpoint
    #[serde(default = "default_admin_topic")]
    pub admin_topic: String,
    /// Largest inbound frame accepted, in bytes
    #[serde(default = "default_max_frame_size")]
    pub max_frame_size: usize,
    /// Capacity of each connection's outbound queue
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,
    /// Seconds between liveness pings (0 disables)
    #[serde(default = "default_ping_interval_secs")]
    pub ping_interval_secs: u64,
}

impl BrokerConfig {
    /// Liveness probe interval, `None` when disabled
    #[must_use]
    pub fn ping_interval(&self) -> Option<Duration> {
        (self.ping_interval_secs > 0).then(|| Duration::from_secs(self.ping_interval_secs))
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            admin_topic: default_admin_topic(),
            max_frame_size: default_max_frame_size(),
            outbound_buffer: default_outbound_buffer(),
            ping_interval_secs: default_ping_interval_secs(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "stomp-broker".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "public".to_string()
}

fn default_admin_topic() -> String {
    "/topic/chat".to_string()
}

fn default_max_frame_size() -> usize {
    64 * 1024
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_ping_interval_secs() -> u64 {
    30
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a value that cannot be parsed.
    /// Every variable is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "PORT")?.unwrap_or_else(default_port),
                static_dir: lookup("STATIC_DIR").unwrap_or_else(default_static_dir),
            },
            broker: BrokerConfig {
                admin_topic: lookup("ADMIN_TOPIC").unwrap_or_else(default_admin_topic),
                max_frame_size: parse_var(&lookup, "MAX_FRAME_SIZE")?
                    .unwrap_or_else(default_max_frame_size),
                outbound_buffer: parse_var::<_, usize>(&lookup, "OUTBOUND_BUFFER")?
                    .filter(|n| *n > 0)
                    .unwrap_or_else(default_outbound_buffer),
                ping_interval_secs: parse_var(&lookup, "PING_INTERVAL_SECS")?
                    .unwrap_or_else(default_ping_interval_secs),
            },
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
