//! ---
//! tfy_section: "05-binaries"
//! tfy_subsection: "binary"
//! tfy_type: "source"
//! tfy_scope: "code"
//! tfy_description: "Dashboard launcher for the Trackify terminal UI."
//! tfy_version: "v0.1.0"
//! tfy_owner: "tbd"
//! ---
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{ArgAction, Parser};
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::broadcast;
use trackify_common::config::AppConfig;
use trackify_common::logging::init_file_tracing;
use trackify_common::time::now_utc;
use trackify_common::version::VersionInfo;
use trackify_core::FleetWorld;
use trackify_sim::SimulationRunner;

mod app;
mod map;
mod ui;

use app::App;

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "Trackify control center: terminal fleet dashboard",
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

    /// Print extended version information and exit
    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    version: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", VersionInfo::current().extended());
        return Ok(());
    }

    let mut candidates = Vec::new();
    if let Some(path) = &cli.config {
        candidates.push(path.clone());
    }
    candidates.push(PathBuf::from("configs/example.dev.toml"));
    candidates.push(PathBuf::from("configs/example.prod.toml"));

    let mut config = AppConfig::load(&candidates)?;
    if let Some(seed) = cli.seed {
        config.simulation.random_seed = seed;
    }
    if let Some(ms) = cli.tick_interval_ms {
        config.simulation.tick_interval = Duration::from_millis(ms);
    }
    config.validate()?;

    // The alternate screen owns stdout, so logs go to the file sink only.
    init_file_tracing("trackify-ui", &config.logging)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let world = FleetWorld::from_seeds(&config.devices, now_utc()).into_shared();
    let (shutdown_tx, shutdown_rx) = broadcast::channel(4);

    if config.simulation.enabled {
        let _guard = runtime.enter();
        SimulationRunner::new(
            world.clone(),
            config.simulation.random_seed,
            config.simulation.tick_interval,
        )
        .spawn(shutdown_rx);
    }

    let mut app = App::new(world, &config.insight, runtime.handle().clone());
    // One automatic analysis at startup; further fetches are user-triggered.
    app.refresh_insight("Analyzing fleet data...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen, Hide)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    cleanup_terminal(&mut terminal)?;
    let _ = shutdown_tx.send(());
    runtime.shutdown_timeout(Duration::from_secs(1));

    if let Err(err) = result {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
    Ok(())
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    let frame_rate = Duration::from_millis(200);
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;
        if event::poll(frame_rate)? {
            match event::read()? {
                Event::Key(key) => {
                    if app.handle_key(key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {
                    // redraw with new geometry
                }
                _ => {}
            }
        }
    }
    Ok(())
}
