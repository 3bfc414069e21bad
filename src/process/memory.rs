//! Memory parsing utilities for reading process memory from /proc.

use std::fs;
use std::io;
use std::path::Path;

/// Reads VmRSS from /proc/<pid>/status. Returns resident memory in bytes.
pub fn read_rss_bytes(proc_path: &Path) -> Result<u64, io::Error> {
    let content = fs::read_to_string(proc_path.join("status"))?;

    for line in content.lines() {
        if let Some(v) = line.strip_prefix("VmRSS:") {
            if let Some(kb) = parse_kb_value(v) {
                return Ok(kb * 1024);
            }
        }
    }

    // Kernel threads have no VmRSS line; they hold no resident user memory.
    Ok(0)
}

/// Parses kilobyte values from status file lines ("  1234 kB").
pub fn parse_kb_value(v: &str) -> Option<u64> {
    v.split_whitespace().next()?.parse().ok()
}
