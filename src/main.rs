use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;
use species_board::app::SpeciesBoardApp;
use species_board::config::{DashboardConfig, DatasetSource, Profile};
use species_board::data::loader;
use species_board::state::AppState;

/// Reactive species measurement dashboard.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Built-in dashboard variant.
    #[arg(long, value_enum, default_value = "iris")]
    profile: Profile,

    /// JSON config file; replaces the profile.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset file (.csv, .json, .parquet); overrides the configured source.
    #[arg(long)]
    data: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::for_profile(cli.profile),
    };
    if let Some(path) = cli.data {
        config.dataset = DatasetSource::File { path };
    }
    log::info!("Using dashboard '{}' with {:?}", config.title, config.dataset);

    let dataset = loader::load_dataset(&config.dataset, &config.category_column)
        .inspect_err(|e| log::error!("Failed to load dataset: {e:#}"))
        .context("loading dataset")?;
    config.validate(&dataset).context("checking dashboard config")?;
    log::info!(
        "Dataset ready: {} rows, categories {:?}",
        dataset.len(),
        dataset.categories()
    );

    let title = config.title.clone();
    let state = AppState::new(config, Arc::new(dataset));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(SpeciesBoardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
