//! CPU statistics parsing for sampled processes.
//!
//! This module parses `/proc/<pid>/stat` and maintains the per-pid cache
//! used to turn monotonic CPU time into a usage percent over the interval
//! since the previous sample.

use ahash::AHashMap as HashMap;
use once_cell::sync::Lazy;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::RwLock as StdRwLock;
use std::time::Instant;

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> f64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as f64;
            }
        }
    }
    // Fallback to common default for error cases or non-Unix platforms
    100.0
}

/// System clock ticks per second (for CPU time calculation).
pub static CLK_TCK: Lazy<f64> = Lazy::new(get_clk_tck);

/// Fields of /proc/<pid>/stat the sampler needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatFields {
    pub ppid: u32,
    /// utime + stime converted to seconds.
    pub cpu_time_seconds: f64,
}

/// Cache entry for delta-based CPU calculation.
#[derive(Clone, Copy)]
pub struct CpuEntry {
    pub cpu_time_seconds: f64,
    pub last_updated: Instant,
}

/// Per-pid CPU sample cache shared across cycles.
pub type CpuCache = StdRwLock<HashMap<u32, CpuEntry>>;

/// Parses ppid and CPU time from /proc/<pid>/stat.
///
/// The comm field (2) may contain spaces and parentheses, so the line is
/// split after the last `)` before indexing the remaining fields: ppid is
/// field 4, utime/stime are fields 14/15.
pub fn parse_stat(proc_path: &Path) -> Result<StatFields, io::Error> {
    let content = fs::read_to_string(proc_path.join("stat"))?;

    let rest = content
        .rfind(')')
        .map(|i| &content[i + 1..])
        .ok_or_else(|| io::Error::other("invalid stat format"))?;

    // After the comm field: state ppid pgrp ... utime(idx 11) stime(idx 12)
    let parts: Vec<&str> = rest.split_whitespace().collect();
    if parts.len() <= 12 {
        return Err(io::Error::other("invalid stat format"));
    }

    let ppid: u32 = parts[1]
        .parse()
        .map_err(|_| io::Error::other("failed to parse ppid field"))?;
    let utime: f64 = parts[11].parse().unwrap_or(0.0);
    let stime: f64 = parts[12].parse().unwrap_or(0.0);

    Ok(StatFields {
        ppid,
        cpu_time_seconds: (utime + stime) / *CLK_TCK,
    })
}

/// Computes the CPU percent for a pid from the delta between the current
/// CPU time and the cached previous sample, then stores the new sample.
/// Without a previous sample the percent is 0.0.
pub fn cpu_percent_from_cache(pid: u32, cpu_time_seconds: f64, cache: &CpuCache) -> f64 {
    let now = Instant::now();

    let mut cpu_percent = 0.0;
    {
        let cache_read = cache.read().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = cache_read.get(&pid) {
            let dt = now.duration_since(entry.last_updated).as_secs_f64();
            if dt > 0.0 {
                let delta_cpu = cpu_time_seconds - entry.cpu_time_seconds;
                if delta_cpu > 0.0 {
                    cpu_percent = (delta_cpu / dt) * 100.0;
                }
            }
        }
    }

    {
        let mut cache_write = cache.write().unwrap_or_else(|e| e.into_inner());
        cache_write.insert(
            pid,
            CpuEntry {
                cpu_time_seconds,
                last_updated: now,
            },
        );
    }

    cpu_percent
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;

    const STAT_LINE: &str = "1234 (test_process) S 1 1234 1234 0 -1 4194304 100 0 0 0 1000 500 0 0 20 0 1 0 12345 12345678 1234 18446744073709551615 4194304 4238788 140736466511168 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0";

    #[test]
    fn test_parse_stat() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("stat"), STAT_LINE).expect("Failed to write stat file");

        let fields = parse_stat(dir.path()).expect("parse_stat failed");
        assert_eq!(fields.ppid, 1);

        // utime=1000, stime=500 ticks
        let expected = 1500.0 / *CLK_TCK;
        assert!(
            (fields.cpu_time_seconds - expected).abs() < 0.001,
            "Expected ~{:.3}, got {:.3}",
            expected,
            fields.cpu_time_seconds
        );
    }

    #[test]
    fn test_parse_stat_comm_with_spaces_and_parens() {
        let dir = tempdir().expect("Failed to create temp dir");
        let content = "99 (tmux: server (1)) S 7 99 99 0 -1 4194304 0 0 0 0 200 100 0 0 20 0 1 0 1 1 1 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0";
        std::fs::write(dir.path().join("stat"), content).expect("Failed to write stat file");

        let fields = parse_stat(dir.path()).expect("parse_stat failed");
        assert_eq!(fields.ppid, 7);
        let expected = 300.0 / *CLK_TCK;
        assert!((fields.cpu_time_seconds - expected).abs() < 0.001);
    }

    #[test]
    fn test_parse_stat_invalid() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("stat"), "1234 (test) S 1 2 3")
            .expect("Failed to write stat file");
        assert!(parse_stat(dir.path()).is_err());
    }

    #[test]
    fn test_parse_stat_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(parse_stat(dir.path()).is_err());
    }

    #[test]
    fn test_cpu_percent_first_sample_is_zero() {
        let cache = CpuCache::default();
        assert_eq!(cpu_percent_from_cache(1, 10.0, &cache), 0.0);
        // The sample must have been stored for the next delta.
        assert!(cache.read().unwrap().contains_key(&1));
    }

    #[test]
    fn test_cpu_percent_delta_between_samples() {
        let cache = CpuCache::default();
        // Seed a sample taken one second ago with 0.5s less CPU time.
        cache.write().unwrap().insert(
            1,
            CpuEntry {
                cpu_time_seconds: 1.0,
                last_updated: Instant::now() - Duration::from_secs(1),
            },
        );

        let percent = cpu_percent_from_cache(1, 1.5, &cache);
        // 0.5s of CPU over ~1s of wall clock: about 50%.
        assert!(
            (percent - 50.0).abs() < 5.0,
            "expected ~50%, got {percent:.2}"
        );
    }

    #[test]
    fn test_cpu_percent_never_negative() {
        let cache = CpuCache::default();
        cache.write().unwrap().insert(
            1,
            CpuEntry {
                cpu_time_seconds: 5.0,
                last_updated: Instant::now() - Duration::from_secs(1),
            },
        );
        // A pid reuse can make the counter go backwards; clamp to zero.
        assert_eq!(cpu_percent_from_cache(1, 2.0, &cache), 0.0);
    }
}
