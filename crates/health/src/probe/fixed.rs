//! Probe returning configured values, for tests and demos.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::{DiskStats, Inventory, LoadAverage, MemoryStats, SystemProbe};
use crate::error::{ProbeError, Result};

#[derive(Debug, Clone)]
struct FixedProbeState {
    disk: Option<DiskStats>,
    memory: Option<MemoryStats>,
    load: LoadAverage,
    hostname: Option<String>,
    inventory: Inventory,
    readonly: HashSet<PathBuf>,
}

impl Default for FixedProbeState {
    fn default() -> Self {
        Self {
            disk: Some(DiskStats {
                free_bytes: 2_000_000_000,
                total_bytes: 10_000_000_000,
            }),
            memory: Some(MemoryStats {
                used_bytes: 10_000_000,
                peak_bytes: 12_000_000,
            }),
            load: LoadAverage::new(0.5, 0.3, 0.1),
            hostname: Some("workshop-web-01".to_string()),
            inventory: Inventory {
                server_software: Some("axum/0.8".to_string()),
                runtime_version: Some("0.1.0".to_string()),
                server_modules: Some(vec!["mod_rewrite".to_string(), "mod_headers".to_string()]),
                runtime_extensions: vec!["json".to_string(), "curl".to_string()],
            },
            readonly: HashSet::new(),
        }
    }
}

/// In-memory probe. Starts out healthy; every path is writable until marked
/// read-only.
///
/// Clones share state, so a test can keep a handle and change readings after
/// the probe has been handed to an aggregator.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    state: Arc<RwLock<FixedProbeState>>,
}

impl FixedProbe {
    /// Creates a probe with healthy readings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a probe where every measurement is unavailable.
    pub fn unavailable() -> Self {
        let probe = Self::new();
        {
            let mut state = probe.state.write().unwrap();
            state.disk = None;
            state.memory = None;
            state.load = LoadAverage::unavailable();
            state.hostname = None;
            state.inventory = Inventory::default();
        }
        probe
    }

    /// Sets the disk reading; `None` makes the probe fail.
    pub fn set_disk(&self, disk: Option<DiskStats>) {
        self.state.write().unwrap().disk = disk;
    }

    /// Sets the memory reading; `None` makes the probe fail.
    pub fn set_memory(&self, memory: Option<MemoryStats>) {
        self.state.write().unwrap().memory = memory;
    }

    /// Sets the load averages.
    pub fn set_load(&self, load: LoadAverage) {
        self.state.write().unwrap().load = load;
    }

    /// Sets the host name.
    pub fn set_hostname(&self, hostname: Option<&str>) {
        self.state.write().unwrap().hostname = hostname.map(str::to_string);
    }

    /// Replaces the server/runtime inventory.
    pub fn set_inventory(&self, inventory: Inventory) {
        self.state.write().unwrap().inventory = inventory;
    }

    /// Marks `path` as read-only (or writable again).
    pub fn set_readonly(&self, path: impl Into<PathBuf>, readonly: bool) {
        let path = path.into();
        let mut state = self.state.write().unwrap();
        if readonly {
            state.readonly.insert(path);
        } else {
            state.readonly.remove(&path);
        }
    }
}

impl SystemProbe for FixedProbe {
    fn disk_stats(&self, _path: &Path) -> Result<DiskStats> {
        self.state
            .read()
            .unwrap()
            .disk
            .ok_or_else(|| ProbeError::Unsupported("disk statistics".to_string()))
    }

    fn memory_stats(&self) -> Result<MemoryStats> {
        self.state
            .read()
            .unwrap()
            .memory
            .ok_or_else(|| ProbeError::Unsupported("process memory".to_string()))
    }

    fn load_average(&self) -> LoadAverage {
        self.state.read().unwrap().load
    }

    fn hostname(&self) -> Option<String> {
        self.state.read().unwrap().hostname.clone()
    }

    fn inventory(&self) -> Inventory {
        self.state.read().unwrap().inventory.clone()
    }

    fn is_writable(&self, path: &Path) -> bool {
        !self.state.read().unwrap().readonly.contains(path)
    }
}
