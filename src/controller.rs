//! Sampling lifecycle: cadence, liveness watch, and clean shutdown.
//!
//! One event loop merges three event sources (interval tick, termination
//! signal, watched-process death) into a single wait point; exactly one
//! event is handled per wake-up and a cycle in progress always completes
//! before a cancellation takes effect, so every emitted cycle is
//! well-formed.

use crate::config::SamplerConfig;
use crate::error::SampleError;
use crate::process::SnapshotProvider;
use crate::sampler::run_cycle;
use std::io::Write;
use std::time::Instant;
use tokio::signal;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Why a run stopped cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// SIGINT or SIGTERM was received.
    Signal,
    /// The watched process no longer exists.
    WatchedProcessExited(u32),
}

/// Drives sampling cycles against a provider until a stop condition.
pub struct Controller<P> {
    provider: P,
    config: SamplerConfig,
}

impl<P: SnapshotProvider> Controller<P> {
    pub fn new(provider: P, config: SamplerConfig) -> Self {
        Controller { provider, config }
    }

    /// Runs the sampling loop to completion.
    ///
    /// The interval's first tick fires immediately, so the first sample
    /// is never delayed by a full interval; missed ticks are skipped
    /// rather than bursted, so a slow cycle never causes catch-up cycles.
    /// Returns the stop reason on clean shutdown; an enumeration or
    /// output-write failure is fatal and propagates as an error.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<StopReason, SampleError> {
        let start = Instant::now();

        if let Some(header) = self.config.display.format.header() {
            writeln!(out, "{header}")?;
            out.flush()?;
        }

        let mut ticker = time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Pinned once so no signal arriving between wake-ups is lost.
        let shutdown = termination_signal();
        tokio::pin!(shutdown);

        let reason = loop {
            tokio::select! {
                _ = &mut shutdown => break StopReason::Signal,
                _ = ticker.tick() => {
                    if let Some(pid) = self.config.watch {
                        if self.provider.exists(pid).is_err() {
                            break StopReason::WatchedProcessExited(pid);
                        }
                    }
                    let offset = start.elapsed().as_secs_f64();
                    let totals = run_cycle(
                        &self.provider,
                        &self.config.filter,
                        &self.config.display,
                        offset,
                        out,
                    )?;
                    out.flush()?;
                    debug!(
                        "cycle at {:.6}s: mem={} cpu={:.2}",
                        totals.time_offset, totals.memory_rss, totals.cpu_percent
                    );
                }
            }
        };

        match reason {
            StopReason::Signal => info!("Received termination signal, exiting"),
            StopReason::WatchedProcessExited(pid) => {
                info!("Process with pid {} died, exiting", pid)
            }
        }
        Ok(reason)
    }
}

/// Resolves once a termination request arrives (SIGINT or, on unix,
/// SIGTERM).
async fn termination_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
