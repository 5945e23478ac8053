use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Service configuration loaded explicitly from environment variables.
///
/// Redis and the external dataset path are optional: without `REDIS_URL` the
/// service runs uncached, without `HELP_CENTER_DATA_PATH` it serves the dataset
/// bundled into the binary.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Help-center JSON document. `None` uses the bundled copy.
    pub data_path: Option<PathBuf>,
    /// Redis connection URL (e.g. "redis://127.0.0.1:6379"). `None` disables caching.
    pub redis_url: Option<String>,
    pub cache_ttl_secs: u64,
    /// Chat requests per second. `None` disables rate limiting.
    pub rate_limit_rps: Option<u32>,
}

impl Config {
    /// Optional:
    /// - `HELP_CENTER_LISTEN_ADDR` (default: "127.0.0.1:8080")
    /// - `HELP_CENTER_DATA_PATH` (must exist when set)
    /// - `REDIS_URL`
    /// - `CHAT_CACHE_TTL_SECS` (default: 3600)
    /// - `RATE_LIMIT_RPS` (0 disables)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let listen_addr = var("HELP_CENTER_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr: SocketAddr = listen_addr.parse().map_err(|e| {
            AppError::Config(format!("invalid HELP_CENTER_LISTEN_ADDR '{listen_addr}': {e}"))
        })?;

        let data_path = var("HELP_CENTER_DATA_PATH").map(PathBuf::from);
        if let Some(path) = &data_path {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "help-center dataset not found at {}",
                    path.display()
                )));
            }
        }

        let cache_ttl_secs = match var("CHAT_CACHE_TTL_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("invalid CHAT_CACHE_TTL_SECS '{raw}': {e}"))
            })?,
            None => DEFAULT_CACHE_TTL_SECS,
        };

        let rate_limit_rps = var("RATE_LIMIT_RPS")
            .map(|raw| {
                raw.parse::<u32>().map_err(|e| {
                    AppError::Config(format!("invalid RATE_LIMIT_RPS '{raw}': {e}"))
                })
            })
            .transpose()?
            .filter(|&n| n > 0);

        Ok(Self {
            listen_addr,
            data_path,
            redis_url: var("REDIS_URL").filter(|url| !url.is_empty()),
            cache_ttl_secs,
            rate_limit_rps,
        })
    }
}
