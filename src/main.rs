mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use app::RustyAttritionApp;
use clap::Parser;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

/// Interactive employee attrition dashboard.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Employee table to load (.csv, .tsv, .json or .parquet).
    data: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(long)]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env = env_logger::Env::default().default_filter_or("info");
    let mut logger = env_logger::Builder::from_env(env);
    if cli.debug {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let mut config = DashboardConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(path) = cli.data {
        config.data_path = path;
    }

    // A dataset that cannot be loaded is fatal before any window opens.
    let state = AppState::new(&config)
        .with_context(|| format!("loading dataset {}", config.data_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Attrition – Employee Attrition Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(RustyAttritionApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}
