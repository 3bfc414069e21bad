//! CLI arguments for psbench.
//!
//! This module defines the command-line interface structure using the clap
//! library, including the wait-duration value parser.

use crate::format::OutputFormat;
use clap::{ArgAction, Parser};
use std::time::Duration;

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "psbench",
    about = "Periodic per-process memory/CPU sampler",
    long_about = "Periodic per-process memory/CPU sampler.\n\n\
                  Samples resident memory and CPU usage of the selected processes at a \
                  fixed interval and prints per-process and summary lines in text, CSV, \
                  or JSON format. When a pid or ppid filter is given, the tool watches \
                  that process and exits cleanly once it is gone.",
    version,
    propagate_version = true
)]
pub struct Args {
    /// Filter processes by process pid (0 = disabled)
    #[arg(long, default_value_t = 0)]
    pub pid: u32,

    /// Filter processes by parent process pid (0 = disabled)
    #[arg(long, default_value_t = 0)]
    pub ppid: u32,

    /// Monitor the psbench process itself
    #[arg(long = "self")]
    pub self_filter: bool,

    /// How long to sleep between iterations (e.g. 500ms, 2s, 1m)
    #[arg(long, default_value = "1s", value_parser = parse_wait)]
    pub wait: Duration,

    /// Print only summary stats instead of per-process details
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub sum: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print verbose details to stderr
    #[arg(long)]
    pub verbose: bool,
}

/// Parses a wait interval such as `250ms`, `1s`, `2m`, `1h`, or a bare
/// number of seconds. Zero and negative intervals are rejected.
pub fn parse_wait(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (value, unit) = match s.find(|c: char| c.is_ascii_alphabetic()) {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, "s"),
    };

    let value: f64 = value
        .parse()
        .map_err(|_| format!("invalid duration value: {s:?}"))?;

    let secs = match unit {
        "ms" => value / 1000.0,
        "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        other => return Err(format!("unknown duration unit: {other:?}")),
    };

    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("wait interval must be positive, got {s:?}"));
    }

    Ok(Duration::from_secs_f64(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wait_units() {
        assert_eq!(parse_wait("1s"), Ok(Duration::from_secs(1)));
        assert_eq!(parse_wait("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_wait("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_wait("1h"), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn test_parse_wait_bare_seconds() {
        assert_eq!(parse_wait("5"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_wait("0.5"), Ok(Duration::from_millis(500)));
    }

    #[test]
    fn test_parse_wait_rejects_invalid() {
        assert!(parse_wait("0").is_err());
        assert!(parse_wait("0s").is_err());
        assert!(parse_wait("-1s").is_err());
        assert!(parse_wait("abc").is_err());
        assert!(parse_wait("10x").is_err());
        assert!(parse_wait("").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["psbench"]);
        assert_eq!(args.pid, 0);
        assert_eq!(args.ppid, 0);
        assert!(!args.self_filter);
        assert_eq!(args.wait, Duration::from_secs(1));
        assert!(args.sum);
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.verbose);
    }

    #[test]
    fn test_sum_can_be_disabled() {
        let args = Args::parse_from(["psbench", "--sum", "false", "--format", "csv"]);
        assert!(!args.sum);
        assert_eq!(args.format, OutputFormat::Csv);
    }
}
