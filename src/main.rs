//! Vanuatu Disaster Dashboard - PDNA sector effects & recovery needs viewer
//!
//! Loads the two Cyclone Pam PDNA summary tables once at startup and shows
//! them as interactive bar charts behind a sidebar of filters.

mod charts;
mod config;
mod data;
mod gui;

use anyhow::{anyhow, Context, Result};
use charts::DashboardData;
use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vanuatu_dashboard=debug"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let config_path = DashboardConfig::config_path();
    let config = DashboardConfig::load(&config_path).context("loading dashboard config")?;

    // Both tables are required; any load failure aborts startup.
    let effects = data::load_sector_effects(&config.sector_effects_path, &config.sector_effects)
        .context("loading sector effects")?;
    let needs = data::load_recovery_needs(&config.recovery_needs_path, &config.recovery_needs)
        .context("loading recovery needs")?;
    let dashboard = DashboardData::new(effects, needs);
    info!(
        sectors = dashboard.sectors.len(),
        recovery_rows = dashboard.needs.len(),
        "data ready"
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 850.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Dashboard Bencana Vanuatu"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Dashboard Bencana Vanuatu",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, dashboard, &config)))),
    )
    .map_err(|e| anyhow!("window error: {e}"))
}
