//! Output encodings for per-process and summary lines.
//!
//! Rendering is a pure function of its inputs; the selected format is
//! fixed for the whole run. Every renderer returns exactly one line
//! without a trailing newline.

use clap::ValueEnum;

/// Output encoding selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Csv,
    Json,
}

impl OutputFormat {
    /// Header line emitted once before the first cycle, if the format
    /// has one.
    pub fn header(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Csv => Some("timestamp,pid,ppid,name,memory_rss,cpu"),
            OutputFormat::Text | OutputFormat::Json => None,
        }
    }

    /// Renders one per-process detail line.
    pub fn render_process(
        &self,
        time_offset: f64,
        pid: u32,
        ppid: u32,
        memory_rss: u64,
        cpu: f64,
        name: &str,
    ) -> String {
        match self {
            OutputFormat::Text => {
                format!("{pid} ({ppid}) mem={memory_rss} cpu={cpu:.2} name={name:?}")
            }
            OutputFormat::Csv => {
                format!("{time_offset:.6},{pid},{ppid},{name:?},{memory_rss},{cpu:.2}")
            }
            OutputFormat::Json => format!(
                "{{\"timestamp\":\"{time_offset:.6}\",\"type\":\"process\",\"pid\":{pid},\"ppid\":{ppid},\"memory\":{memory_rss},\"cpu\":{cpu:.2}}}"
            ),
        }
    }

    /// Renders the per-cycle summary line.
    pub fn render_summary(&self, time_offset: f64, total_memory_rss: u64, total_cpu: f64) -> String {
        match self {
            OutputFormat::Text => {
                format!("Total {time_offset:.6}: mem={total_memory_rss} cpu={total_cpu:.2}")
            }
            OutputFormat::Csv => {
                format!("{time_offset:.6},,,,{total_memory_rss},{total_cpu:.2}")
            }
            OutputFormat::Json => format!(
                "{{\"timestamp\":\"{time_offset:.6}\",\"type\":\"summary\",\"memory\":{total_memory_rss},\"cpu\":{total_cpu:.2}}}"
            ),
        }
    }
}
