//! Process snapshot access.
//!
//! This module provides:
//! - the [`SnapshotProvider`] and [`ProcessHandle`] capability traits the
//!   sampler is written against,
//! - `proc_fs`: the /proc-backed provider used in production,
//! - `cpu`: /proc/<pid>/stat parsing and the per-pid CPU delta cache,
//! - `memory`: resident-set parsing from /proc/<pid>/status.

pub mod cpu;
pub mod memory;
pub mod proc_fs;

use crate::error::ProviderError;

/// Per-process facts, queried field by field so a single unreadable field
/// only skips that process for the current cycle.
pub trait ProcessHandle {
    fn pid(&self) -> u32;
    fn ppid(&self) -> Result<u32, ProviderError>;
    fn rss_bytes(&self) -> Result<u64, ProviderError>;
    /// CPU usage percent over the interval since the previous query for
    /// this pid. The first query for a pid reports 0.0.
    fn cpu_percent(&self) -> Result<f64, ProviderError>;
    fn name(&self) -> Result<String, ProviderError>;
}

/// Source of process snapshots.
pub trait SnapshotProvider {
    type Handle: ProcessHandle;

    /// Enumerates the current process set. Total failure is fatal for
    /// the run.
    fn processes(&self) -> Result<Vec<Self::Handle>, ProviderError>;

    /// Confirms a pid still exists; `ProviderError::NotFound` once it is
    /// gone.
    fn exists(&self, pid: u32) -> Result<(), ProviderError>;
}

// Re-export commonly used types
pub use cpu::{parse_stat, CpuEntry, StatFields, CLK_TCK};
pub use memory::{parse_kb_value, read_rss_bytes};
pub use proc_fs::{ProcFs, ProcHandle};
