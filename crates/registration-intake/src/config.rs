//! Configuration for the intake service.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Environment variable holding the MongoDB connection string.
pub const MONGODB_URI_ENV: &str = "MONGODB_URI";

/// Service configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Document store configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB connection string; also read from `MONGODB_URI`
    #[serde(default)]
    pub uri: Option<SecretString>,

    /// Database name
    #[serde(default = "default_database_name")]
    pub name: String,

    /// Collection holding registration records
    #[serde(default = "default_collection")]
    pub collection: String,

    /// How long to wait for a usable server before failing a request
    #[serde(default = "default_server_selection_timeout", with = "humantime_serde")]
    pub server_selection_timeout: Duration,

    /// Connection pool ceiling
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,

    /// Persist to MongoDB (if false, records are kept in memory only)
    #[serde(default = "default_true")]
    pub persist: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Also advertise GET in preflight responses
    #[serde(default)]
    pub allow_get: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub json: bool,
}

// Default implementations
impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: None,
            name: default_database_name(),
            collection: default_collection(),
            server_selection_timeout: default_server_selection_timeout(),
            max_pool_size: default_max_pool_size(),
            persist: true,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value functions
fn default_database_name() -> String {
    "orcamentaria".into()
}

fn default_collection() -> String {
    "precadastros".into()
}

fn default_server_selection_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_max_pool_size() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nested keys use `__` as separator (`SERVER__PORT`, `DATABASE__NAME`).
    /// `MONGODB_URI`, when set, overrides `DATABASE__URI`.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .set_override_option("database.uri", std::env::var(MONGODB_URI_ENV).ok())
            .context("Failed to apply MONGODB_URI")?
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
