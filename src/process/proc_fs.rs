//! /proc-backed snapshot provider.
//!
//! Scans the proc root for numeric entries and exposes per-process facts
//! through the [`SnapshotProvider`] traits. The root is configurable so
//! tests can point the provider at a synthetic tree.

use crate::error::ProviderError;
use crate::process::cpu::{cpu_percent_from_cache, parse_stat, CpuCache};
use crate::process::memory::read_rss_bytes;
use crate::process::{ProcessHandle, SnapshotProvider};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Snapshot provider reading from the /proc filesystem.
pub struct ProcFs {
    root: PathBuf,
    cpu_cache: Arc<CpuCache>,
}

impl ProcFs {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    /// Provider rooted at an arbitrary directory laid out like /proc.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        ProcFs {
            root: root.into(),
            cpu_cache: Arc::new(CpuCache::default()),
        }
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotProvider for ProcFs {
    type Handle = ProcHandle;

    fn processes(&self) -> Result<Vec<ProcHandle>, ProviderError> {
        let entries = fs::read_dir(&self.root).map_err(ProviderError::Enumeration)?;

        let mut out = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let name = match path.file_name().and_then(|s| s.to_str()) {
                Some(v) => v,
                None => continue,
            };
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let pid: u32 = match name.parse() {
                Ok(v) => v,
                Err(_) => continue,
            };
            out.push(ProcHandle {
                pid,
                proc_path: path,
                cpu_cache: Arc::clone(&self.cpu_cache),
            });
        }
        Ok(out)
    }

    fn exists(&self, pid: u32) -> Result<(), ProviderError> {
        if self.root.join(pid.to_string()).is_dir() {
            Ok(())
        } else {
            Err(ProviderError::NotFound(pid))
        }
    }
}

/// Handle to one /proc/<pid> directory.
pub struct ProcHandle {
    pid: u32,
    proc_path: PathBuf,
    cpu_cache: Arc<CpuCache>,
}

impl ProcessHandle for ProcHandle {
    fn pid(&self) -> u32 {
        self.pid
    }

    fn ppid(&self) -> Result<u32, ProviderError> {
        let fields = parse_stat(&self.proc_path)
            .map_err(|e| ProviderError::info(self.pid, "ppid", e))?;
        Ok(fields.ppid)
    }

    fn rss_bytes(&self) -> Result<u64, ProviderError> {
        read_rss_bytes(&self.proc_path).map_err(|e| ProviderError::info(self.pid, "memory", e))
    }

    fn cpu_percent(&self) -> Result<f64, ProviderError> {
        let fields = parse_stat(&self.proc_path)
            .map_err(|e| ProviderError::info(self.pid, "cpu", e))?;
        Ok(cpu_percent_from_cache(
            self.pid,
            fields.cpu_time_seconds,
            &self.cpu_cache,
        ))
    }

    fn name(&self) -> Result<String, ProviderError> {
        read_process_name(&self.proc_path)
            .ok_or_else(|| ProviderError::info(self.pid, "name", io::Error::other("no name")))
    }
}

/// Reads process name from comm file or extracts it from cmdline.
fn read_process_name(proc_path: &Path) -> Option<String> {
    if let Ok(s) = fs::read_to_string(proc_path.join("comm")) {
        let t = s.trim();
        if !t.is_empty() {
            return Some(t.into());
        }
    }

    if let Ok(content) = fs::read(proc_path.join("cmdline")) {
        if let Some(argv0) = content
            .split(|&b| b == 0u8)
            .filter_map(|s| std::str::from_utf8(s).ok())
            .next()
        {
            if let Some(name) = Path::new(argv0).file_name() {
                return name.to_str().map(|s| s.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    const STAT_TEMPLATE: &str = " S %PPID% 1 1 0 -1 4194304 0 0 0 0 100 50 0 0 20 0 1 0 1 1 1 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0";

    fn fake_proc(entries: &[(u32, u32, &str, u64)]) -> TempDir {
        let root = tempdir().expect("Failed to create temp dir");
        for &(pid, ppid, name, rss_kb) in entries {
            let dir = root.path().join(pid.to_string());
            fs::create_dir(&dir).unwrap();
            let stat = format!(
                "{pid} ({name}){}",
                STAT_TEMPLATE.replace("%PPID%", &ppid.to_string())
            );
            fs::write(dir.join("stat"), stat).unwrap();
            fs::write(
                dir.join("status"),
                format!("Name:\t{name}\nVmRSS:\t{rss_kb} kB\n"),
            )
            .unwrap();
            fs::write(dir.join("comm"), format!("{name}\n")).unwrap();
        }
        // Non-numeric entries must be ignored by the scan.
        fs::create_dir(root.path().join("sys")).unwrap();
        fs::write(root.path().join("uptime"), "100.0 200.0\n").unwrap();
        root
    }

    #[test]
    fn test_processes_lists_numeric_dirs_only() {
        let root = fake_proc(&[(1, 0, "init", 100), (2, 1, "worker", 200)]);
        let provider = ProcFs::with_root(root.path());

        let mut pids: Vec<u32> = provider
            .processes()
            .unwrap()
            .iter()
            .map(|h| h.pid())
            .collect();
        pids.sort_unstable();
        assert_eq!(pids, vec![1, 2]);
    }

    #[test]
    fn test_handle_fields() {
        let root = fake_proc(&[(2, 1, "worker", 200)]);
        let provider = ProcFs::with_root(root.path());
        let handles = provider.processes().unwrap();
        let h = &handles[0];

        assert_eq!(h.pid(), 2);
        assert_eq!(h.ppid().unwrap(), 1);
        assert_eq!(h.rss_bytes().unwrap(), 200 * 1024);
        assert_eq!(h.name().unwrap(), "worker");
        // First CPU query has no previous sample to diff against.
        assert_eq!(h.cpu_percent().unwrap(), 0.0);
    }

    #[test]
    fn test_handle_reports_info_error_on_missing_files() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("3")).unwrap();
        let provider = ProcFs::with_root(root.path());
        let handles = provider.processes().unwrap();
        let h = &handles[0];

        assert!(matches!(h.ppid(), Err(ProviderError::Info { pid: 3, .. })));
        assert!(matches!(h.rss_bytes(), Err(ProviderError::Info { .. })));
        assert!(matches!(h.cpu_percent(), Err(ProviderError::Info { .. })));
        assert!(matches!(h.name(), Err(ProviderError::Info { .. })));
    }

    #[test]
    fn test_name_falls_back_to_cmdline() {
        let root = tempdir().unwrap();
        let dir = root.path().join("5");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("cmdline"), b"/usr/bin/some-daemon\0--flag\0").unwrap();

        let provider = ProcFs::with_root(root.path());
        let handles = provider.processes().unwrap();
        assert_eq!(handles[0].name().unwrap(), "some-daemon");
    }

    #[test]
    fn test_exists() {
        let root = fake_proc(&[(1, 0, "init", 100)]);
        let provider = ProcFs::with_root(root.path());

        assert!(provider.exists(1).is_ok());
        assert!(matches!(
            provider.exists(999),
            Err(ProviderError::NotFound(999))
        ));
    }

    #[test]
    fn test_enumeration_error_on_missing_root() {
        let provider = ProcFs::with_root("/nonexistent/proc/root");
        assert!(matches!(
            provider.processes(),
            Err(ProviderError::Enumeration(_))
        ));
    }
}
