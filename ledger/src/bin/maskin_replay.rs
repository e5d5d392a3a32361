// Maskin ledger replay tool
//
// Purpose: build a token ledger (and optionally its deputation) from a config
// file, apply a script of calls in order, and print one JSON line per call
// followed by every committed event.
//
// Usage:
//   cargo run --bin maskin_replay -- --config ledger.json --script calls.json

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use maskin_common::config::VERSION;
use maskin_ledger::replay::{Call, Replay, ReplayConfig};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "maskin_replay", version = VERSION)]
#[command(about = "Replay a script of calls against a fresh Maskin ledger")]
struct Args {
    /// Path to the ledger config (token and optional deputation sections)
    #[arg(short, long)]
    config: PathBuf,

    /// Path to the JSON list of calls
    #[arg(short, long)]
    script: PathBuf,

    /// Stop at the first rejected call
    #[arg(long, default_value_t = false)]
    stop_on_error: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config_data = fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read {}", args.config.display()))?;
    let config: ReplayConfig =
        serde_json::from_str(&config_data).context("Failed to parse ledger config")?;

    let script_data = fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read {}", args.script.display()))?;
    let calls: Vec<Call> =
        serde_json::from_str(&script_data).context("Failed to parse call script")?;

    let mut replay = Replay::new(&config).context("Invalid ledger config")?;
    info!("Replaying {} call(s)", calls.len());

    let reports = replay.run(&calls, args.stop_on_error);
    let rejected = reports.iter().filter(|r| r.code.is_some()).count();
    for report in &reports {
        println!("{}", serde_json::to_string(report)?);
    }
    for event in replay.drain_events()? {
        println!("{}", serde_json::to_string(&event)?);
    }

    if rejected > 0 {
        warn!("{} of {} call(s) rejected", rejected, reports.len());
    } else {
        info!("All {} call(s) applied", reports.len());
    }
    Ok(())
}
