//! Application configuration loaded from environment variables.

use std::str::FromStr;
use std::time::Duration;

use auth::Credentials;
use chrono::TimeDelta;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingJwtSecret,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Which [`order_store::OrderRepository`] adapter backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Token signing settings.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime; always positive.
    pub ttl: TimeDelta,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// PostgreSQL connection and pool settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: PgSslMode,
    /// Connections kept open while idle.
    pub max_idle_conns: u32,
    pub max_open_conns: u32,
    pub conn_max_lifetime: Duration,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(self.ssl_mode)
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.max_idle_conns.min(self.max_open_conns))
            .max_connections(self.max_open_conns)
            .max_lifetime(self.conn_max_lifetime)
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("max_open_conns", &self.max_open_conns)
            .field("conn_max_lifetime", &self.conn_max_lifetime)
            .finish_non_exhaustive()
    }
}

/// Logging settings, readable before the rest of the configuration so the
/// subscriber is in place while [`Config`] is loaded.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub environment: String,
    /// `RUST_LOG` when set, otherwise a default for the environment.
    pub filter: String,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = non_empty("ENVIRONMENT").unwrap_or_else(|| "development".to_string());
        let filter = non_empty("RUST_LOG").unwrap_or_else(|| {
            if environment == "development" {
                "info,tower_http=debug".to_string()
            } else {
                "info".to_string()
            }
        });

        Self {
            environment,
            filter,
        }
    }

    /// Human-readable logs in development, JSON lines elsewhere.
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

/// Server configuration.
///
/// Reads from environment variables:
/// - `HOST` / `PORT`: bind address (default: `localhost:8080`)
/// - `ENVIRONMENT`: `development` turns on request-level debug logs
/// - `RUST_LOG`: tracing filter directive, overrides the environment default
/// - `JWT_SECRET` (required) and `JWT_EXPIRATION_HOURS` (default: `120`)
/// - `TEST_USERNAME` / `TEST_PASSWORD`: the single accepted login
/// - `ORDER_STORE`: `postgres` (default) or `memory`
/// - `DB_*`: PostgreSQL connection and pool settings
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log: LogConfig,
    pub jwt: JwtConfig,
    /// The single accepted login; empty disables login.
    pub credentials: Credentials,
    pub store: StoreBackend,
    pub database: DatabaseConfig,
}

const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 120;

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let secret = lookup("JWT_SECRET").unwrap_or_default();
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }

        let ttl = match lookup("JWT_EXPIRATION_HOURS") {
            None => default_ttl(),
            Some(raw) => token_ttl(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "invalid JWT_EXPIRATION_HOURS, using default");
                default_ttl()
            }),
        };

        let store = parse("ORDER_STORE", get("ORDER_STORE", "postgres"))?;

        Ok(Self {
            host: get("HOST", "localhost"),
            port: parse("PORT", get("PORT", "8080"))?,
            log: LogConfig::from_lookup(&lookup),
            jwt: JwtConfig { secret, ttl },
            credentials: Credentials::new(
                lookup("TEST_USERNAME").unwrap_or_default(),
                lookup("TEST_PASSWORD").unwrap_or_default(),
            ),
            store,
            database: DatabaseConfig {
                host: get("DB_HOST", "localhost"),
                port: parse("DB_PORT", get("DB_PORT", "5432"))?,
                user: get("DB_USER", "postgres"),
                password: get("DB_PASSWORD", "postgres"),
                name: get("DB_NAME", "order_management"),
                ssl_mode: parse("DB_SSL_MODE", get("DB_SSL_MODE", "disable"))?,
                max_idle_conns: parse("DB_MAX_IDLE_CONNS", get("DB_MAX_IDLE_CONNS", "10"))?,
                max_open_conns: parse("DB_MAX_OPEN_CONNS", get("DB_MAX_OPEN_CONNS", "100"))?,
                conn_max_lifetime: Duration::from_secs(parse(
                    "DB_CONN_MAX_LIFETIME_SECS",
                    get("DB_CONN_MAX_LIFETIME_SECS", "3600"),
                )?),
            },
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_ttl() -> TimeDelta {
    TimeDelta::hours(DEFAULT_JWT_EXPIRATION_HOURS)
}

/// Parses a whole number of hours; `None` unless positive and representable.
fn token_ttl(raw: &str) -> Option<TimeDelta> {
    let hours: i64 = raw.trim().parse().ok()?;
    if hours <= 0 {
        return None;
    }
    TimeDelta::try_hours(hours)
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
