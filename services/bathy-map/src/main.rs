//! Bathymetry Map
//!
//! Renders the False Bay depth map with contours, coastline and landmarks.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use bathy_map::{run, MapConfig};

/// Bathymetry map renderer
#[derive(Parser, Debug)]
#[command(name = "bathy-map")]
#[command(about = "Render a bathymetry, coastline and landmark map to PNG")]
struct Args {
    /// YAML configuration file; built-in defaults when omitted
    #[arg(short, long, env = "BATHY_MAP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "BATHY_MAP_JSON_LOGS")]
    json_logs: bool,
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Map run failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn execute(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!(config = ?path, "Loading configuration");
            MapConfig::from_yaml(path)?
        }
        None => MapConfig::default(),
    };

    info!(
        bathymetry = ?config.inputs.bathymetry,
        coastline = ?config.inputs.coastline,
        landmarks = ?config.inputs.landmarks,
        output = ?config.output,
        "Starting bathymetry map run"
    );

    let summary = run(&config)?;

    info!(
        output = ?summary.output,
        rows = summary.grid.rows,
        cols = summary.grid.cols,
        subpaths = summary.coastline_subpaths,
        landmarks = summary.landmarks,
        bytes = summary.png_bytes,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "All done"
    );
    Ok(())
}
