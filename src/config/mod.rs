use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_PORT: u16 = 3333;

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

/// Optional overrides from `{data_dir}/config.toml`.
#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    port: Option<u16>,
    log: Option<String>,
    bind_address: Option<String>,
    log_format: Option<String>,
    /// Queries slower than this (milliseconds) are logged at WARN. 0 = off.
    slow_query_threshold_ms: Option<u64>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

/// Daemon configuration, built once at startup and passed by `Arc` into the
/// components that need it. Nothing reads process-wide state after this.
#[derive(Debug, Clone)]
pub struct HabitdConfig {
    pub port: u16,
    /// Directory holding the SQLite database and config.toml. Required.
    pub data_dir: PathBuf,
    pub log: String,
    /// Bind address for the HTTP server (HABITD_BIND env var, default: "127.0.0.1").
    pub bind_address: String,
    /// Log output format: "pretty" (default) | "json".
    pub log_format: String,
    /// Slow-query log threshold in milliseconds. 0 disables it.
    pub slow_query_threshold_ms: u64,
}

impl HabitdConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    ///
    /// The data directory is the one setting without a default: it names the
    /// storage target, and starting without it is a configuration error.
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        bind_address: Option<String>,
    ) -> Result<Self> {
        let data_dir = data_dir.ok_or_else(|| {
            anyhow::anyhow!("data directory not configured — pass --data-dir or set HABITD_DATA_DIR")
        })?;

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let port = port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let log = log.or(toml.log).unwrap_or_else(|| "info".to_string());

        let bind_address = bind_address
            .or(std::env::var("HABITD_BIND").ok().filter(|s| !s.is_empty()))
            .or(toml.bind_address)
            .unwrap_or_else(default_bind_address);

        let log_format = std::env::var("HABITD_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| "pretty".to_string());

        let slow_query_threshold_ms = toml.slow_query_threshold_ms.unwrap_or(0);

        Ok(Self {
            port,
            data_dir,
            log,
            bind_address,
            log_format,
            slow_query_threshold_ms,
        })
    }
}
