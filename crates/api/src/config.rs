//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use health::aggregator::{DEFAULT_DISK_PATH, DEFAULT_LOG_DIR, DEFAULT_MEMORY_LIMIT};
use health::{AggregatorSettings, ComponentProbe, Inventory, UnavailablePolicy};

/// Web server software reported in the health document.
pub const SERVER_SOFTWARE: &str = "axum/0.8";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `pretty` or `json` (default: `pretty`)
/// - `DOCUMENT_ROOT` — web root to report and probe (default: unset)
/// - `HEALTH_LOG_DIR` — log directory to probe (default: `/var/log`)
/// - `HEALTH_DISK_PATH` — path whose filesystem is measured (default: `/`)
/// - `HEALTH_MEMORY_LIMIT` — reported memory ceiling (default: `unlimited`)
/// - `HEALTH_SERVER_MODULES` — comma-separated loaded modules (default: `mod_headers`)
/// - `HEALTH_RUNTIME_EXTENSIONS` — comma-separated extensions (default: `json`)
/// - `HEALTH_UNAVAILABLE_POLICY` — `degraded` or `ok` (default: `degraded`)
///
/// Unparseable values fall back to their defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub document_root: Option<String>,
    pub log_dir: PathBuf,
    pub disk_path: PathBuf,
    pub memory_limit: String,
    pub server_modules: Vec<String>,
    pub runtime_extensions: Vec<String>,
    pub unavailable_policy: UnavailablePolicy,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            document_root: lookup("DOCUMENT_ROOT").filter(|root| !root.is_empty()),
            log_dir: lookup("HEALTH_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            disk_path: lookup("HEALTH_DISK_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.disk_path),
            memory_limit: lookup("HEALTH_MEMORY_LIMIT").unwrap_or(defaults.memory_limit),
            server_modules: lookup("HEALTH_SERVER_MODULES")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.server_modules),
            runtime_extensions: lookup("HEALTH_RUNTIME_EXTENSIONS")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.runtime_extensions),
            unavailable_policy: lookup("HEALTH_UNAVAILABLE_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.unavailable_policy),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings handed to the health aggregator.
    pub fn aggregator_settings(&self) -> AggregatorSettings {
        AggregatorSettings {
            document_root: self.document_root.clone(),
            log_dir: self.log_dir.clone(),
            disk_path: self.disk_path.clone(),
            memory_limit: self.memory_limit.clone(),
            unavailable_policy: self.unavailable_policy,
            database: ComponentProbe::not_configured(),
        }
    }

    /// What this binary reports about itself.
    pub fn inventory(&self) -> Inventory {
        Inventory {
            server_software: Some(SERVER_SOFTWARE.to_string()),
            runtime_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            server_modules: Some(self.server_modules.clone()),
            runtime_extensions: self.runtime_extensions.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            document_root: None,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            disk_path: PathBuf::from(DEFAULT_DISK_PATH),
            memory_limit: DEFAULT_MEMORY_LIMIT.to_string(),
            server_modules: vec!["mod_headers".to_string()],
            runtime_extensions: vec!["json".to_string()],
            unavailable_policy: UnavailablePolicy::Degraded,
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
