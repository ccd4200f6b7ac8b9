//! ---
//! courier_section: "05-operator-tooling"
//! courier_subsection: "binary"
//! courier_type: "source"
//! courier_scope: "code"
//! courier_description: "Control CLI for exercising courier queues."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use courier_common::{init_tracing, CourierConfig, LoadedCourierConfig};
use courier_queue::Queue;
use serde::Serialize;
use tracing::info;

mod scenario;

const DEFAULT_CONFIG_CANDIDATES: [&str; 2] = ["courier.toml", "configs/courier.toml"];

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Exercise an in-process courier queue and inspect its configuration",
    long_about = None
)]
struct Cli {
    /// Configuration file (defaults to COURIER_CONFIG, then ./courier.toml, then configs/courier.toml).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Many producers, one consumer; verifies per-producer ordering.
    #[command(name = "fanin")]
    FanIn(FanInArgs),
    /// Many requesters, one responder; verifies request/response pairing.
    #[command(name = "pingpong")]
    PingPong(PingPongArgs),
    #[command(subcommand, about = "Configuration inspection")]
    Config(ConfigCommand),
}

#[derive(Debug, Args)]
struct FanInArgs {
    /// Number of producer threads (overrides bench.producers).
    #[arg(long)]
    producers: Option<usize>,
    /// Messages sent by each producer (overrides bench.messages_per_producer).
    #[arg(long)]
    messages: Option<usize>,
}

#[derive(Debug, Args)]
struct PingPongArgs {
    /// Number of requester threads (overrides bench.requesters).
    #[arg(long)]
    requesters: Option<usize>,
    /// Requests sent by each requester (overrides bench.requests_per_requester).
    #[arg(long)]
    requests: Option<usize>,
    /// Per-request timeout in milliseconds, 0 waits forever (overrides queue.request_timeout_ms).
    #[arg(long = "timeout-ms", value_name = "MS")]
    timeout_ms: Option<u64>,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as TOML.
    Show,
}

fn load_config(explicit: Option<&PathBuf>) -> Result<LoadedCourierConfig> {
    match explicit {
        // An explicit file beats COURIER_CONFIG and the default candidates.
        Some(path) => {
            if !path.exists() {
                return Err(anyhow!("config file {} not found", path.display()));
            }
            Ok(LoadedCourierConfig {
                config: CourierConfig::from_path(path)?,
                source: Some(path.clone()),
            })
        }
        None => CourierConfig::load_with_source(&DEFAULT_CONFIG_CANDIDATES),
    }
}

fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let LoadedCourierConfig { config, source } = load_config(cli.config.as_ref())?;
    init_tracing("courierctl", &config.logging)?;
    info!(
        source = %source
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "defaults".to_owned()),
        "configuration loaded"
    );

    match cli.command {
        Commands::FanIn(args) => {
            let queue = Queue::with_config(&config.queue);
            let report = scenario::run_fan_in(
                &queue,
                args.producers.unwrap_or(config.bench.producers),
                args.messages.unwrap_or(config.bench.messages_per_producer),
            )?;
            print_json(&report)?;
            if report.out_of_order > 0 {
                return Err(anyhow!("{} messages arrived out of order", report.out_of_order));
            }
        }
        Commands::PingPong(args) => {
            let queue = Queue::with_config(&config.queue);
            let timeout = args
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(config.queue.request_timeout);
            let report = scenario::run_ping_pong(
                &queue,
                args.requesters.unwrap_or(config.bench.requesters),
                args.requests.unwrap_or(config.bench.requests_per_requester),
                timeout,
            )?;
            print_json(&report)?;
            if report.mismatched > 0 {
                return Err(anyhow!("{} responses were mismatched", report.mismatched));
            }
        }
        Commands::Config(ConfigCommand::Show) => {
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}
