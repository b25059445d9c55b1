//! ---
//! tfy_section: "05-binaries"
//! tfy_subsection: "binary"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Binary entrypoint for the Trackify daemon."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{info, warn};
use trackify_common::config::AppConfig;
use trackify_common::logging::init_tracing;
use trackify_common::time::now_utc;
use trackify_common::version::VersionInfo;
use trackify_core::FleetWorld;
use trackify_insight::InsightAdvisor;
use trackify_sim::SimulationRunner;

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "Trackify daemon: runs the fleet simulation without a terminal UI",
    long_about = None
)]
struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the simulation random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the simulation tick interval in milliseconds
    #[arg(long, value_name = "MS")]
    tick_interval_ms: Option<u64>,

    /// Run a fixed number of ticks and exit (scripted runs)
    #[arg(long)]
    ticks: Option<u64>,

    /// Print extended version information and exit
    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    version: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let version = VersionInfo::current();
    if cli.version {
        println!("{}", version.extended());
        return Ok(());
    }

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/example.prod.toml"));
    candidates.push(PathBuf::from("configs/example.dev.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let mut config = loaded.config;
    if let Some(seed) = cli.seed {
        config.simulation.random_seed = seed;
    }
    if let Some(ms) = cli.tick_interval_ms {
        config.simulation.tick_interval = Duration::from_millis(ms);
    }
    config.validate()?;

    init_tracing("trackifyd", &config.logging)?;
    match &loaded.source {
        Some(path) => info!(config_path = %path.display(), "configuration loaded"),
        None => info!("no configuration file found; using built-in defaults"),
    }
    info!(
        version = %version.cli_string(),
        devices = config.devices.len(),
        tick_ms = config.simulation.tick_interval.as_millis() as u64,
        "trackifyd starting"
    );

    let world = FleetWorld::from_seeds(&config.devices, now_utc()).into_shared();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(4);

    let runner = if config.simulation.enabled {
        Some(
            SimulationRunner::new(
                world.clone(),
                config.simulation.random_seed,
                config.simulation.tick_interval,
            )
            .with_max_ticks(cli.ticks)
            .spawn(shutdown_rx),
        )
    } else {
        warn!("simulation disabled by configuration");
        None
    };

    // One automatic insight fetch at startup; failures degrade to the
    // adapter's fallback text and never block the loop.
    if config.insight.enabled {
        let advisor = InsightAdvisor::new(config.insight.clone());
        let snapshot = world.read().snapshot();
        let advice = advisor.advise(&snapshot).await;
        info!(advice = %advice, "fleet insight");
    } else {
        info!("insight advisor disabled by configuration");
    }

    match runner {
        Some(handle) if cli.ticks.is_some() => {
            let ticks = handle.await?;
            let world = world.read();
            info!(
                ticks,
                alerts = world.alerts().len(),
                average_speed = world.average_speed(),
                "scripted run complete"
            );
        }
        Some(handle) => {
            signal::ctrl_c().await?;
            info!("ctrl-c received; shutting down");
            let _ = shutdown_tx.send(());
            let ticks = handle.await?;
            info!(ticks, "simulation stopped");
        }
        None => {
            signal::ctrl_c().await?;
            info!("ctrl-c received; shutting down");
        }
    }

    Ok(())
}
