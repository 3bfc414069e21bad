//! One sampling cycle: enumerate, filter, aggregate, emit.
//!
//! Per-process field reads are best effort: a process whose ppid, memory,
//! CPU, or (when details are printed) name cannot be read is skipped for
//! the cycle without contributing to the totals. Only a total enumeration
//! failure or an output write failure aborts the cycle.

use crate::config::DisplayConfig;
use crate::error::SampleError;
use crate::filter::FilterConfig;
use crate::process::{ProcessHandle, SnapshotProvider};
use std::io::Write;
use tracing::debug;

/// Totals of one completed cycle. Created and discarded per cycle; no
/// carry-over between cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleTotals {
    pub time_offset: f64,
    pub memory_rss: u64,
    pub cpu_percent: f64,
}

/// Runs one full sampling cycle and emits its lines to `out`.
///
/// Per-process lines (when not summary-only) come out in provider
/// enumeration order, each before its fact enters the running totals; the
/// summary line always follows all per-process lines.
pub fn run_cycle<P, W>(
    provider: &P,
    filter: &FilterConfig,
    display: &DisplayConfig,
    time_offset: f64,
    out: &mut W,
) -> Result<CycleTotals, SampleError>
where
    P: SnapshotProvider,
    W: Write,
{
    let handles = provider.processes()?;

    let mut total_rss: u64 = 0;
    let mut total_cpu: f64 = 0.0;

    for handle in &handles {
        let pid = handle.pid();
        if !filter.matches_pid(pid) {
            continue;
        }

        let ppid = match handle.ppid() {
            Ok(v) => v,
            Err(e) => {
                debug!("skipping pid {}: {}", pid, e);
                continue;
            }
        };
        if !filter.includes(pid, ppid) {
            continue;
        }

        let rss = match handle.rss_bytes() {
            Ok(v) => v,
            Err(e) => {
                debug!("skipping pid {}: {}", pid, e);
                continue;
            }
        };
        let cpu = match handle.cpu_percent() {
            Ok(v) => v,
            Err(e) => {
                debug!("skipping pid {}: {}", pid, e);
                continue;
            }
        };

        if !display.summary_only {
            let name = match handle.name() {
                Ok(v) => v,
                Err(e) => {
                    debug!("skipping pid {}: {}", pid, e);
                    continue;
                }
            };
            writeln!(
                out,
                "{}",
                display
                    .format
                    .render_process(time_offset, pid, ppid, rss, cpu, &name)
            )?;
        }

        total_rss += rss;
        total_cpu += cpu;
    }

    writeln!(
        out,
        "{}",
        display.format.render_summary(time_offset, total_rss, total_cpu)
    )?;

    Ok(CycleTotals {
        time_offset,
        memory_rss: total_rss,
        cpu_percent: total_cpu,
    })
}
