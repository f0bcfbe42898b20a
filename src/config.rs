use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use log::info;
use thiserror::Error;

use crate::application::cart_sessions::{DEFAULT_IDLE_TTL, DEFAULT_MAX_SESSIONS};
use crate::infrastructure::BackendConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} must be a valid {expected}, got '{value}'")]
    Invalid {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub backend: BackendConfig,
    /// Unset keeps carts in memory only.
    pub cart_storage_dir: Option<PathBuf>,
    /// Upper bound on carts held in memory at once.
    pub cart_session_limit: usize,
    /// Carts untouched for this long may be dropped from memory.
    pub cart_idle_ttl: Duration,
    pub catalog_seed_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let backend_url = var("BACKEND_URL").ok_or(ConfigError::Missing("BACKEND_URL"))?;
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parsed(var("PORT"), "PORT", "port number")?.unwrap_or(8080);
        let cart_session_limit =
            parsed(var("CART_SESSION_LIMIT"), "CART_SESSION_LIMIT", "positive integer")?
                .unwrap_or(DEFAULT_MAX_SESSIONS);
        let cart_idle_ttl =
            parsed(var("CART_IDLE_MINUTES"), "CART_IDLE_MINUTES", "number of minutes")?
                .map(|minutes: u64| Duration::from_secs(minutes.saturating_mul(60)))
                .unwrap_or(DEFAULT_IDLE_TTL);

        let cart_storage_dir = var("CART_STORAGE_DIR").map(PathBuf::from);
        if cart_storage_dir.is_none() {
            info!("CART_STORAGE_DIR not set, carts are kept in memory only");
        }

        Ok(Self {
            database_url,
            host,
            port,
            backend: BackendConfig::new(backend_url, var("BACKEND_API_KEY").unwrap_or_default()),
            cart_storage_dir,
            cart_session_limit,
            cart_idle_ttl,
            catalog_seed_path: var("CATALOG_SEED_PATH").map(PathBuf::from),
        })
    }
}

fn parsed<T: FromStr>(
    raw: Option<String>,
    key: &'static str,
    expected: &'static str,
) -> Result<Option<T>, ConfigError> {
    raw.map(|raw| {
        raw.trim().parse().map_err(|_| ConfigError::Invalid {
            key,
            expected,
            value: raw,
        })
    })
    .transpose()
}
