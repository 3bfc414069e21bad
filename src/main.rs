//! psbench binary entry point.
//!
//! Wires CLI arguments into the sampling controller: tracing goes to
//! stderr (verbose diagnostics only under --verbose), formatted samples
//! go to stdout, and the exit code is 0 on clean shutdown and 1 on a
//! fatal enumeration or output failure.

use clap::Parser;
use psbench::{Args, Controller, ProcFs, SamplerConfig};
use std::io;
use std::process::ExitCode;
use tracing::{error, info, Level};

/// Initializes tracing logging on stderr. Diagnostics are visible only
/// under --verbose; errors are always emitted.
fn setup_logging(verbose: bool) {
    let log_level = if verbose { Level::DEBUG } else { Level::ERROR };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(args.verbose);

    let config = SamplerConfig::from_args(&args);
    info!("Starting process monitoring");

    let controller = Controller::new(ProcFs::new(), config);
    let stdout = io::stdout();

    match controller.run(&mut stdout.lock()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(1)
        }
    }
}
