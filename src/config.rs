//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): full PostgreSQL connection string, overrides the `DB_*` parts
/// - `DB_HOST`, `DB_NAME`, `DB_USERNAME`, `DB_PASSWORD`: PostgreSQL connection parts
/// - `DB_PORT` (optional): PostgreSQL port, defaults to 5432
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 5000
/// - `WAREHOUSE_HOST` / `WAREHOUSE_PORT` (optional): warehouse RPC endpoint, defaults to localhost:3000
/// - `WAREHOUSE_RETRY_DELAY_SECS` (optional): delay before the single startup reconnect, defaults to 5
/// - `WAREHOUSE_RPC_TIMEOUT_SECS` (optional): deadline for one `prepareOrder` call, defaults to 30
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: Option<String>,

    pub db_host: Option<String>,
    pub db_name: Option<String>,
    pub db_username: Option<String>,
    pub db_password: Option<String>,

    #[serde(default = "default_db_port")]
    pub db_port: u16,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_warehouse_host")]
    pub warehouse_host: String,

    #[serde(default = "default_warehouse_port")]
    pub warehouse_port: u16,

    #[serde(default = "default_retry_delay_secs")]
    pub warehouse_retry_delay_secs: u64,

    #[serde(default = "default_rpc_timeout_secs")]
    pub warehouse_rpc_timeout_secs: u64,
}

fn default_db_port() -> u16 {
    5432
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    5000
}

fn default_warehouse_host() -> String {
    "localhost".to_string()
}

fn default_warehouse_port() -> u16 {
    3000
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_rpc_timeout_secs() -> u64 {
    30
}

/// Configuration could not be assembled.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] envy::Error),

    #[error("missing database setting {0} (or set DATABASE_URL)")]
    MissingDatabaseSetting(&'static str),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database settings are incomplete (neither DATABASE_URL nor all DB_* parts)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, ConfigError> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of `(KEY, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)?;
        config.database_url()?;
        Ok(config)
    }

    /// PostgreSQL connection string.
    ///
    /// `DATABASE_URL` wins when present; otherwise the URL is assembled from the `DB_*` parts.
    pub fn database_url(&self) -> Result<String, ConfigError> {
        if let Some(url) = &self.database_url {
            return Ok(url.clone());
        }

        let host = required(&self.db_host, "DB_HOST")?;
        let name = required(&self.db_name, "DB_NAME")?;
        let user = required(&self.db_username, "DB_USERNAME")?;
        let password = required(&self.db_password, "DB_PASSWORD")?;

        Ok(format!(
            "postgres://{user}:{password}@{host}:{}/{name}",
            self.db_port
        ))
    }

    /// `host:port` of the warehouse RPC service.
    pub fn warehouse_addr(&self) -> String {
        format!("{}:{}", self.warehouse_host, self.warehouse_port)
    }

    pub fn warehouse_retry_delay(&self) -> Duration {
        Duration::from_secs(self.warehouse_retry_delay_secs)
    }

    pub fn warehouse_rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.warehouse_rpc_timeout_secs)
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .ok_or(ConfigError::MissingDatabaseSetting(name))
}
