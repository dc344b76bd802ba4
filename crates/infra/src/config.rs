//! Environment configuration.
//!
//! Immutable after startup; the composition root loads it once and hands
//! value objects down. Missing optional variables fall back to defaults,
//! `JWT_SECRET` is required and must be non-empty.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is missing or empty")]
    MissingVar(&'static str),
}

/// Database connection parameters.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl DbConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

/// Process configuration value object.
#[derive(Debug, Clone)]
pub struct Config {
    pub db: DbConfig,
    /// HTTP listen port.
    pub port: u16,
    pub jwt_secret: String,
    /// Token TTL in seconds.
    pub jwt_expiration_secs: u64,
    pub log_level: String,
    /// `release` (JSON logs) or `debug` (human-readable logs).
    pub app_env: String,
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env_var("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?;

        Ok(Self {
            db: DbConfig {
                host: env_var("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port: env_parsed("DB_PORT").unwrap_or(5432),
                name: env_var("DB_NAME").unwrap_or_else(|| "user_order".to_string()),
                user: env_var("DB_USER").unwrap_or_else(|| "postgres".to_string()),
                password: env_var("DB_PASSWORD").unwrap_or_default(),
            },
            port: env_parsed("PORT").unwrap_or(8080),
            jwt_secret,
            // Absent *or* unparsable falls back to one hour.
            jwt_expiration_secs: env_parsed("JWT_EXPIRATION").unwrap_or(3600),
            log_level: env_var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            app_env: env_var("APP_ENV").unwrap_or_else(|| "release".to_string()),
        })
    }
}

fn env_var(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env_var(key)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var = key, value = %raw, "unparsable environment variable, using default");
            None
        }
    }
}
