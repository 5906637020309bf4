//! Sub-check records and how they are derived from probe readings.

use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::probe::{DiskStats, Inventory, LoadAverage, MemoryStats};
use crate::rules::{self, CheckRule, CheckStatus};

/// What to report when a disk or memory reading cannot be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnavailablePolicy {
    /// Report `unknown` and degrade the overall verdict.
    #[default]
    Degraded,
    /// Report `ok` with empty measurements.
    Ok,
}

impl UnavailablePolicy {
    fn status(self) -> CheckStatus {
        match self {
            UnavailablePolicy::Degraded => CheckStatus::Unknown,
            UnavailablePolicy::Ok => CheckStatus::Ok,
        }
    }
}

impl FromStr for UnavailablePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degraded" => Ok(UnavailablePolicy::Degraded),
            "ok" => Ok(UnavailablePolicy::Ok),
            other => Err(format!("unknown unavailable policy: {other}")),
        }
    }
}

// -- Resource checks --

#[derive(Debug, Clone, Serialize)]
pub struct DiskCheck {
    pub free_bytes: Option<u64>,
    pub total_bytes: Option<u64>,
    pub free_percent: Option<f64>,
    pub status: CheckStatus,
}

impl DiskCheck {
    pub fn from_reading(reading: Result<DiskStats>, policy: UnavailablePolicy) -> Self {
        match reading {
            Ok(stats) => {
                let rule = &rules::DISK_SPACE;
                Self {
                    free_bytes: Some(stats.free_bytes),
                    total_bytes: Some(stats.total_bytes),
                    free_percent: Some(percent(stats.free_bytes, stats.total_bytes)),
                    status: rule.status(rule.passes(stats.free_bytes as f64)),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "disk probe failed");
                Self {
                    free_bytes: None,
                    total_bytes: None,
                    free_percent: None,
                    status: policy.status(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryCheck {
    pub used_bytes: Option<u64>,
    pub peak_bytes: Option<u64>,
    pub limit_bytes: String,
    pub status: CheckStatus,
}

impl MemoryCheck {
    pub fn from_reading(
        reading: Result<MemoryStats>,
        limit: &str,
        policy: UnavailablePolicy,
    ) -> Self {
        match reading {
            Ok(stats) => {
                let rule = &rules::MEMORY;
                Self {
                    used_bytes: Some(stats.used_bytes),
                    peak_bytes: Some(stats.peak_bytes),
                    limit_bytes: limit.to_string(),
                    status: rule.status(rule.passes(stats.used_bytes as f64)),
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "memory probe failed");
                Self {
                    used_bytes: None,
                    peak_bytes: None,
                    limit_bytes: limit.to_string(),
                    status: policy.status(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadCheck {
    #[serde(rename = "1min", serialize_with = "load_figure")]
    pub one_minute: Option<f64>,
    #[serde(rename = "5min", serialize_with = "load_figure")]
    pub five_minutes: Option<f64>,
    #[serde(rename = "15min", serialize_with = "load_figure")]
    pub fifteen_minutes: Option<f64>,
    pub status: CheckStatus,
}

impl LoadCheck {
    /// A missing 1-minute figure counts as zero load.
    pub fn from_reading(load: LoadAverage) -> Self {
        let rule = &rules::LOAD_AVERAGE;
        Self {
            one_minute: load.one,
            five_minutes: load.five,
            fifteen_minutes: load.fifteen,
            status: rule.status(rule.passes(load.one.unwrap_or(0.0))),
        }
    }
}

fn load_figure<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_f64(*v),
        None => serializer.serialize_str("unknown"),
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemChecks {
    pub disk_space: DiskCheck,
    pub memory: MemoryCheck,
    pub load_average: LoadCheck,
}

// -- Component checks --

pub const WEB_SERVER_RUNNING: &str = "running";
pub const RUNTIME_WORKING: &str = "working";
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ServerModules {
    pub mod_rewrite: bool,
    pub mod_ssl: bool,
    pub mod_headers: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebServerCheck {
    pub status: &'static str,
    pub version: String,
    pub modules: ServerModules,
}

impl WebServerCheck {
    pub fn from_inventory(inventory: &Inventory) -> Self {
        Self {
            status: WEB_SERVER_RUNNING,
            version: inventory
                .server_software
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            modules: ServerModules {
                mod_rewrite: inventory.has_module("mod_rewrite"),
                mod_ssl: inventory.has_module("mod_ssl"),
                mod_headers: inventory.has_module("mod_headers"),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RuntimeExtensions {
    pub mysql: bool,
    pub curl: bool,
    pub json: bool,
    pub openssl: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RuntimeCheck {
    pub status: &'static str,
    pub version: String,
    pub extensions: RuntimeExtensions,
}

impl RuntimeCheck {
    pub fn from_inventory(inventory: &Inventory) -> Self {
        Self {
            status: RUNTIME_WORKING,
            version: inventory
                .runtime_version
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            extensions: RuntimeExtensions {
                mysql: inventory.has_extension(&["mysql", "mysqli"]),
                curl: inventory.has_extension(&["curl"]),
                json: inventory.has_extension(&["json"]),
                openssl: inventory.has_extension(&["openssl"]),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseCheck {
    pub status: &'static str,
    pub connection: &'static str,
    pub error: String,
}

pub const DATABASE_NOT_CONFIGURED: &str = "Database connection not configured in this demo";

/// How the database component is checked.
///
/// Only the stub exists today: it never connects and always reports the
/// component as unconfigured.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ComponentProbe {
    Stub { reason: String },
}

impl ComponentProbe {
    pub fn not_configured() -> Self {
        ComponentProbe::Stub {
            reason: DATABASE_NOT_CONFIGURED.to_string(),
        }
    }

    pub fn check(&self) -> DatabaseCheck {
        match self {
            ComponentProbe::Stub { reason } => DatabaseCheck {
                status: "unknown",
                connection: "not_configured",
                error: reason.clone(),
            },
        }
    }
}

impl Default for ComponentProbe {
    fn default() -> Self {
        Self::not_configured()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationChecks {
    pub web_server: WebServerCheck,
    pub runtime: RuntimeCheck,
    pub database: DatabaseCheck,
}

// -- Filesystem checks --

#[derive(Debug, Clone, Serialize)]
pub struct FilesystemCheck {
    pub path: String,
    pub writable: bool,
    pub status: CheckStatus,
}

impl FilesystemCheck {
    pub fn new(path: impl Into<String>, writable: bool, rule: &CheckRule) -> Self {
        Self {
            path: path.into(),
            writable,
            status: rule.status(rule.passes_flag(writable)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FilesystemChecks {
    pub web_root: FilesystemCheck,
    pub log_directory: FilesystemCheck,
}
