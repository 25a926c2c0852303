//! Application configuration management.

use chrono_tz::Tz;
use serde::Deserialize;

use crate::types::Currency;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Primary and foreign currency of the budgets.
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Calendar settings.
    #[serde(default)]
    pub app: CalendarConfig,
    /// Log output settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

/// Where budgets are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// PostgreSQL through SeaORM.
    #[default]
    Postgres,
    /// Process-local store; data is lost on restart.
    Memory,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: StorageBackend,
    /// Database connection URL (required for `postgres`).
    #[serde(default)]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret shared with the auth provider.
    pub secret: String,
    /// Expected `aud` claim.
    #[serde(default = "default_audience")]
    pub audience: String,
    /// Lifetime of development tokens in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_audience() -> String {
    "authenticated".to_string()
}

fn default_access_token_expiry() -> u64 {
    3600
}

/// Currency configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CurrencyConfig {
    /// Currency every budget amount is kept in.
    #[serde(default = "default_primary_currency")]
    pub primary: Currency,
    /// Currency of the foreign expense sub-ledger.
    #[serde(default = "default_foreign_currency")]
    pub foreign: Currency,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_currency(),
            foreign: default_foreign_currency(),
        }
    }
}

fn default_primary_currency() -> Currency {
    Currency::Eur
}

fn default_foreign_currency() -> Currency {
    Currency::Brl
}

/// Calendar configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// IANA time zone used to decide which month is "current".
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Log configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is inconsistent.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("BUDGETLY").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints `serde` cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` describing the first problem found.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "jwt.secret must not be empty".to_string(),
            ));
        }
        if self.database.backend == StorageBackend::Postgres && self.database.url.is_empty() {
            return Err(config::ConfigError::Message(
                "database.url is required for the postgres backend".to_string(),
            ));
        }
        if self.currency.primary == self.currency.foreign {
            return Err(config::ConfigError::Message(
                "currency.primary and currency.foreign must differ".to_string(),
            ));
        }
        self.timezone()?;
        Ok(())
    }

    /// Parses the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` for unknown zone names.
    pub fn timezone(&self) -> Result<Tz, config::ConfigError> {
        self.app.timezone.parse::<Tz>().map_err(|e| {
            config::ConfigError::Message(format!("invalid app.timezone '{}': {e}", self.app.timezone))
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
