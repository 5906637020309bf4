//! System probe capability and its implementations.
//!
//! The aggregator never touches the OS directly; every measurement goes
//! through [`SystemProbe`], so tests can swap in a [`FixedProbe`].

pub mod fixed;
pub mod system;

use std::path::Path;

use crate::error::Result;

pub use fixed::FixedProbe;
pub use system::SysinfoProbe;

/// Free and total capacity of the filesystem holding a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskStats {
    pub free_bytes: u64,
    pub total_bytes: u64,
}

/// Current and peak memory of the serving process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub used_bytes: u64,
    pub peak_bytes: u64,
}

/// 1, 5 and 15 minute load averages. `None` where the platform has no figure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadAverage {
    pub one: Option<f64>,
    pub five: Option<f64>,
    pub fifteen: Option<f64>,
}

impl LoadAverage {
    /// Builds a fully populated load average.
    pub fn new(one: f64, five: f64, fifteen: f64) -> Self {
        Self {
            one: Some(one),
            five: Some(five),
            fifteen: Some(fifteen),
        }
    }

    /// A load average with no figures at all.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// What the serving stack reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    /// Web server software and version, e.g. `axum/0.8`.
    pub server_software: Option<String>,
    /// Version of the runtime executing the handler.
    pub runtime_version: Option<String>,
    /// Loaded web server modules. `None` when the server cannot list them.
    pub server_modules: Option<Vec<String>>,
    /// Runtime extensions available to the handler.
    pub runtime_extensions: Vec<String>,
}

impl Inventory {
    /// Returns true if the named module is loaded.
    pub fn has_module(&self, name: &str) -> bool {
        self.server_modules
            .as_deref()
            .is_some_and(|modules| modules.iter().any(|m| m == name))
    }

    /// Returns true if any of the named extensions is available.
    pub fn has_extension(&self, names: &[&str]) -> bool {
        self.runtime_extensions
            .iter()
            .any(|ext| names.contains(&ext.as_str()))
    }
}

/// Read-only access to the host's resource and inventory facts.
///
/// Implementations must be cheap to call and must not block on network I/O.
pub trait SystemProbe: Send + Sync {
    /// Free and total bytes of the filesystem containing `path`.
    fn disk_stats(&self, path: &Path) -> Result<DiskStats>;

    /// Memory held by the current process.
    fn memory_stats(&self) -> Result<MemoryStats>;

    /// System load averages; missing figures are `None`.
    fn load_average(&self) -> LoadAverage;

    /// Host name of the machine, if it can be determined.
    fn hostname(&self) -> Option<String>;

    /// Web server and runtime inventory.
    fn inventory(&self) -> Inventory;

    /// Whether the current process has write permission on `path`.
    fn is_writable(&self, path: &Path) -> bool;
}
