//! Life Expectancy Dashboard
//!
//! Four linked charts over the WHO life expectancy dataset, driven by a year
//! slider, a country dropdown and chart clicks.

mod charts;
mod config;
mod data;
mod gui;
mod state;
mod stats;

use anyhow::Context;
use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_directive()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Life Expectancy Dashboard v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(csv = %config.data.csv_path, "dataset path");

    let window = &config.window;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window.width, window.height])
            .with_min_inner_size([window.min_width, window.min_height])
            .with_title("Life Expectancy Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Life Expectancy Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))
}
