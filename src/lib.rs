//! psbench - periodic per-process memory/CPU sampler.
//!
//! Samples resident memory and CPU usage of the selected processes at a
//! fixed interval and emits per-process and summary lines in text, CSV,
//! or JSON format. The sampling core is written against an abstract
//! [`process::SnapshotProvider`], so everything above the /proc layer can
//! be driven deterministically in tests.

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod format;
pub mod process;
pub mod sampler;

// Re-export main types for convenience
pub use cli::Args;
pub use config::{DisplayConfig, SamplerConfig};
pub use controller::{Controller, StopReason};
pub use error::{ProviderError, SampleError};
pub use filter::FilterConfig;
pub use format::OutputFormat;
pub use process::{ProcFs, ProcessHandle, SnapshotProvider};
pub use sampler::{run_cycle, CycleTotals};
