//! Runtime configuration for a sampling run.
//!
//! CLI arguments are resolved once at start-up into an immutable
//! [`SamplerConfig`]; no component reads ambient global state afterwards.

use crate::cli::Args;
use crate::filter::FilterConfig;
use crate::format::OutputFormat;
use std::time::Duration;

/// Output behaviour, fixed for the process lifetime.
#[derive(Debug, Clone, Copy)]
pub struct DisplayConfig {
    /// Suppress per-process lines, emit only the summary.
    pub summary_only: bool,
    pub format: OutputFormat,
    pub verbose: bool,
}

/// Complete configuration of one sampling run.
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    pub filter: FilterConfig,
    pub display: DisplayConfig,
    /// Interval between sampling cycles.
    pub interval: Duration,
    /// Pid whose liveness gates the run; `None` disables the watch.
    pub watch: Option<u32>,
}

impl SamplerConfig {
    /// Resolves parsed CLI arguments into the run configuration.
    ///
    /// `--self` substitutes the tool's own pid as the pid filter. The
    /// watch target is the pid filter when set, otherwise the ppid
    /// filter, otherwise none.
    pub fn from_args(args: &Args) -> Self {
        let pid = if args.self_filter {
            Some(std::process::id())
        } else {
            nonzero(args.pid)
        };
        let ppid = nonzero(args.ppid);

        SamplerConfig {
            filter: FilterConfig { pid, ppid },
            display: DisplayConfig {
                summary_only: args.sum,
                format: args.format,
                verbose: args.verbose,
            },
            interval: args.wait,
            watch: pid.or(ppid),
        }
    }
}

fn nonzero(v: u32) -> Option<u32> {
    if v > 0 {
        Some(v)
    } else {
        None
    }
}
