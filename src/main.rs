use eframe::egui;
use env_logger::Builder;
use log::{LevelFilter, error, info};

use crate::config::BackdropConfig;
use crate::ui::AppState;

mod config;
mod engine;
mod ui;

fn main() -> anyhow::Result<()> {
    // Logging setup; RUST_LOG overrides the defaults below
    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter(Some("neural_backdrop"), LevelFilter::Debug)
        .parse_default_env()
        .init();

    info!("Starting up");

    let config_path = BackdropConfig::resolve_path();
    let config = BackdropConfig::load_or_default(&config_path).inspect_err(|e| error!("{:#}", e))?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_title("Neural Backdrop").with_inner_size([1280.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Neural Backdrop",
        native_options,
        Box::new(move |cc| Ok(Box::new(AppState::new(config, cc.storage)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe exited with an error: {}", e))
}
