//! Pid/ppid filtering for sampled processes.
//!
//! The filter is a pure predicate over already-fetched process facts:
//! a pid filter selects exactly one process, a ppid filter selects the
//! children of the target plus the target itself, so the watched process
//! always appears in its own ppid-filtered output.

/// Process selection configured once at start-up.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterConfig {
    pub pid: Option<u32>,
    pub ppid: Option<u32>,
}

impl FilterConfig {
    /// Cheap pre-check against the pid filter alone, usable before any
    /// per-process field has been read.
    pub fn matches_pid(&self, pid: u32) -> bool {
        match self.pid {
            Some(want) => pid == want,
            None => true,
        }
    }

    /// Full inclusion predicate. Conditions short-circuit on the first
    /// failing rule.
    pub fn includes(&self, pid: u32, ppid: u32) -> bool {
        if let Some(want) = self.pid {
            if pid != want {
                return false;
            }
        }
        if let Some(want) = self.ppid {
            // Children of the target, or the target itself.
            if ppid != want && pid != want {
                return false;
            }
        }
        true
    }
}
