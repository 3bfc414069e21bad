//! Error types for process sampling.
//!
//! The taxonomy separates per-process read failures (recoverable, the
//! affected process is skipped for one cycle) from a total enumeration
//! failure (fatal) and from a watched process disappearing (a normal
//! termination trigger, not an error).

use std::io;
use thiserror::Error;

/// Failures surfaced by a snapshot provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The process list itself could not be obtained. Fatal for the run.
    #[error("failed to enumerate processes: {0}")]
    Enumeration(#[source] io::Error),

    /// A process id no longer exists. For a watched pid this triggers a
    /// clean shutdown.
    #[error("process {0} no longer exists")]
    NotFound(u32),

    /// A single field of a single process could not be read. The process
    /// is skipped for the current cycle only.
    #[error("failed to read {field} for pid {pid}: {source}")]
    Info {
        pid: u32,
        field: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ProviderError {
    pub fn info(pid: u32, field: &'static str, source: io::Error) -> Self {
        Self::Info { pid, field, source }
    }
}

/// Errors that abort a sampling run.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}
