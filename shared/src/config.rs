use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub general: GeneralConfig,
    pub postgres: PostgresConfig,
    pub sqlite: SqliteConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct GeneralConfig {
    pub use_postgres: bool,
    pub request_timeout_in_s: f64,
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub db_name: String,
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub path: String,
}

impl AppConfig {
    /// Reads the whole configuration from the environment once at startup.
    pub fn new() -> Result<Self> {
        let api = ApiConfig {
            host: env::var("API_HOST").unwrap_or_else(|_| "localhost".into()),
            port: env_or("API_PORT", 8000)?,
        };
        let general = GeneralConfig {
            use_postgres: env::var("USE_POSTGRES")
                .map(|v| v == "true")
                .unwrap_or(false),
            request_timeout_in_s: env_or("REQUEST_TIMEOUT_IN_S", 5.0)?,
        };
        if !general.request_timeout_in_s.is_finite() || general.request_timeout_in_s <= 0.0 {
            anyhow::bail!("REQUEST_TIMEOUT_IN_S must be a positive number of seconds");
        }
        let postgres = PostgresConfig {
            host: env::var("POSTGRESQL_HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env_or("POSTGRESQL_PORT", 5432)?,
            db_name: env::var("POSTGRESQL_DB_NAME").unwrap_or_else(|_| "event_handler".into()),
            user_name: env::var("POSTGRESQL_USER_NAME").unwrap_or_default(),
            password: env::var("POSTGRESQL_PASSWORD").unwrap_or_default(),
        };
        let sqlite = SqliteConfig {
            path: env::var("SQLITE_PATH").unwrap_or_else(|_| ":memory:".into()),
        };

        Ok(Self {
            api,
            general,
            postgres,
            sqlite,
        })
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("failed to parse {key}={raw}")),
        Err(_) => Ok(default),
    }
}
