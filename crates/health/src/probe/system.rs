//! Probe backed by the host operating system.

use std::path::Path;

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use super::{DiskStats, Inventory, LoadAverage, MemoryStats, SystemProbe};
use crate::error::{ProbeError, Result};

/// Reads disk space through `statvfs` (via `fs2`), process memory and load
/// through `sysinfo`, and writability through `access(2)` with `W_OK`.
///
/// The inventory is static: it describes the serving binary and is supplied
/// at construction.
#[derive(Debug, Clone)]
pub struct SysinfoProbe {
    inventory: Inventory,
}

impl SysinfoProbe {
    /// Creates a probe reporting the given inventory.
    pub fn new(inventory: Inventory) -> Self {
        Self { inventory }
    }
}

impl SystemProbe for SysinfoProbe {
    fn disk_stats(&self, path: &Path) -> Result<DiskStats> {
        let io_err = |source| ProbeError::Io {
            path: path.to_path_buf(),
            source,
        };
        let free_bytes = fs2::available_space(path).map_err(io_err)?;
        let total_bytes = fs2::total_space(path).map_err(io_err)?;
        if total_bytes == 0 {
            return Err(ProbeError::EmptyFilesystem(path.to_path_buf()));
        }
        Ok(DiskStats {
            free_bytes,
            total_bytes,
        })
    }

    fn memory_stats(&self) -> Result<MemoryStats> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProbeError::Unsupported("process memory".to_string()));
        }
        let pid = sysinfo::get_current_pid()
            .map_err(|e| ProbeError::Unsupported(e.to_string()))?;
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::new().with_memory(),
        );
        let used_bytes = sys
            .process(pid)
            .map(|process| process.memory())
            .ok_or(ProbeError::ProcessNotFound)?;
        let peak_bytes = peak_resident_bytes().unwrap_or(used_bytes).max(used_bytes);
        Ok(MemoryStats {
            used_bytes,
            peak_bytes,
        })
    }

    fn load_average(&self) -> LoadAverage {
        if !sysinfo::IS_SUPPORTED_SYSTEM || cfg!(windows) {
            return LoadAverage::unavailable();
        }
        let load = System::load_average();
        LoadAverage::new(load.one, load.five, load.fifteen)
    }

    fn hostname(&self) -> Option<String> {
        System::host_name()
    }

    fn inventory(&self) -> Inventory {
        self.inventory.clone()
    }

    fn is_writable(&self, path: &Path) -> bool {
        match write_access(path) {
            Ok(()) => true,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "path not writable");
                false
            }
        }
    }
}

/// Permission check only; nothing is created on disk.
#[cfg(unix)]
fn write_access(path: &Path) -> std::io::Result<()> {
    rustix::fs::access(path, rustix::fs::Access::WRITE_OK).map_err(std::io::Error::from)
}

#[cfg(not(unix))]
fn write_access(path: &Path) -> std::io::Result<()> {
    if std::fs::metadata(path)?.permissions().readonly() {
        Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied))
    } else {
        Ok(())
    }
}

/// High-water mark of resident memory (`VmHWM`) from `/proc/self/status`.
#[cfg(target_os = "linux")]
fn peak_resident_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_hwm(&status)
}

#[cfg(not(target_os = "linux"))]
fn peak_resident_bytes() -> Option<u64> {
    None
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_hwm(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmHWM:"))?;
    let kib: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kib * 1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vm_hwm() {
        let status = "Name:\thealth\nVmPeak:\t  20000 kB\nVmHWM:\t    1234 kB\nVmRSS:\t 1000 kB\n";
        assert_eq!(parse_vm_hwm(status), Some(1234 * 1024));
    }

    #[test]
    fn test_parse_vm_hwm_missing() {
        assert_eq!(parse_vm_hwm("Name:\thealth\n"), None);
    }

    #[test]
    fn test_writable_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let probe = SysinfoProbe::new(Inventory::default());
        assert!(probe.is_writable(dir.path()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_writable_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        std::fs::write(&page, "<h1>ok</h1>").unwrap();
        let probe = SysinfoProbe::new(Inventory::default());
        assert!(probe.is_writable(&page));
    }

    #[cfg(unix)]
    #[test]
    fn test_readonly_file_not_writable() {
        use std::os::unix::fs::PermissionsExt;

        // root bypasses permission bits
        if rustix::process::geteuid().is_root() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("index.html");
        std::fs::write(&page, "<h1>ok</h1>").unwrap();
        std::fs::set_permissions(&page, std::fs::Permissions::from_mode(0o444)).unwrap();
        let probe = SysinfoProbe::new(Inventory::default());
        assert!(!probe.is_writable(&page));
    }

    #[test]
    fn test_memory_stats_for_current_process() {
        let probe = SysinfoProbe::new(Inventory::default());
        if let Ok(stats) = probe.memory_stats() {
            assert!(stats.used_bytes > 0);
            assert!(stats.peak_bytes >= stats.used_bytes);
        }
    }

    #[test]
    fn test_missing_dir_not_writable() {
        let dir = tempfile::tempdir().unwrap();
        let probe = SysinfoProbe::new(Inventory::default());
        assert!(!probe.is_writable(&dir.path().join("does-not-exist")));
    }

    #[test]
    fn test_disk_stats_for_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        let probe = SysinfoProbe::new(Inventory::default());
        let stats = probe.disk_stats(dir.path()).unwrap();
        assert!(stats.total_bytes > 0);
        assert!(stats.free_bytes <= stats.total_bytes);
    }

    #[test]
    fn test_disk_stats_missing_path() {
        let probe = SysinfoProbe::new(Inventory::default());
        let result = probe.disk_stats(Path::new("/definitely/not/a/real/path"));
        assert!(matches!(result, Err(ProbeError::Io { .. })));
    }
}
