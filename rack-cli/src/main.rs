//! # rack-sim
//!
//! Rack and node failure simulator for multi-zone Kubernetes clusters.
//!
//! ## Actions
//!
//! - `health-check`: Report node readiness and critical-service zone spread
//! - `simulate-node`: Fail one random node, check health, restore it
//! - `simulate-rack`: Fail every node of one random rack, check health, restore them
//! - `recover-node`, `recover-rack`: Reserved, do nothing
//! - `label-zones`: Label cluster nodes with their rack
//!
//! ## Example
//!
//! ```bash
//! # Check the cluster
//! rack-sim health-check
//!
//! # Fail one rack with short waits
//! rack-sim simulate-rack --stabilization-time 30 --downtime 5
//!
//! # Dry run without touching nodes
//! rack-sim simulate-node --mock
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

mod commands;
mod config;
mod logging;

use commands::{health, label, recover, simulate, Command};
use config::Config;
use rack_client::{current_node, KubeCluster};
use rack_core::ScenarioKind;

/// Rack and node failure simulator for Kubernetes clusters.
#[derive(Parser, Debug)]
#[command(name = "rack-sim")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Action: health-check, simulate-node, simulate-rack, recover-node,
    /// recover-rack or label-zones
    action: String,

    /// Seconds to wait before each health check
    #[arg(long)]
    stabilization_time: Option<u64>,

    /// Seconds targets stay down after the first check
    #[arg(long)]
    downtime: Option<u64>,

    /// Configuration file (default: rack-sim.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulate failures instead of touching nodes
    #[arg(long)]
    mock: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config.with_overrides(cli.stabilization_time, cli.downtime, cli.mock),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _guard = logging::init(&config.logging);

    match run(&cli.action, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), action = %cli.action, "run failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(action: &str, config: &Config) -> Result<()> {
    let command: Command = action.parse()?;
    if !command.needs_cluster() {
        recover::run(command);
        return Ok(());
    }

    let topology = config.topology()?;
    let cluster = KubeCluster::try_default()
        .await
        .context("failed to create cluster client")?;
    let current = current_node(
        &topology,
        &config.host.node_name_env,
        config.host.fallback_node.as_deref(),
    );
    info!(action = %command, node = %current, nodes = topology.len(), "starting");

    match command {
        Command::HealthCheck => {
            health::run(cluster, config).await?;
        }
        Command::SimulateNode => {
            simulate::run(cluster, config, topology, current, ScenarioKind::Node).await?;
        }
        Command::SimulateRack => {
            simulate::run(cluster, config, topology, current, ScenarioKind::Zone).await?;
        }
        Command::LabelZones => {
            label::run(&cluster, config, &topology).await?;
        }
        Command::RecoverNode | Command::RecoverRack => recover::run(command),
    }
    Ok(())
}
