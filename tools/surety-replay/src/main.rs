//! Surety-Replay: apply a recorded call log and print the resulting state.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use surety_replay::{load_call_log, replay};

/// Surety-Replay: Flight Surety call-log replay
#[derive(Parser, Debug)]
#[command(name = "surety-replay")]
#[command(about = "Replay a Flight Surety call log and dump the final state as JSON")]
struct Args {
    /// Call log (JSON)
    #[arg(short, long)]
    log: PathBuf,

    /// Include every published event in the report
    #[arg(long)]
    events: bool,

    /// Exit non-zero if any invariant is violated after the replay
    #[arg(long)]
    check: bool,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run passed (always true without `--check`).
async fn run(args: &Args) -> Result<bool> {
    let log = load_call_log(&args.log)?;
    info!(path = %args.log.display(), calls = log.calls.len(), "Replaying call log");

    let report = replay(log, args.events).await?;
    let json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
    println!("{json}");

    if args.check && !report.invariants_hold() {
        for violation in &report.violations {
            error!(%violation, "Invariant violated");
        }
        return Ok(false);
    }
    Ok(true)
}
