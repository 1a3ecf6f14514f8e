mod app;
mod config;
mod data;
mod state;
mod ui;

use anyhow::{anyhow, Result};
use app::Top2000App;
use clap::Parser;
use config::{AppConfig, Cli};
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli)?;
    log::info!("Using data file {}", config.source.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Top 2000 – Zoeken",
        options,
        Box::new(|_cc| Ok(Box::new(Top2000App::new(config)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
