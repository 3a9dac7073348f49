//! Climate Dashboard - Annual climate statistics from a spreadsheet
//!
//! Loads one record per year, derives temperature range, anomaly and decade,
//! and shows tables and charts in a window or exports them as PNG files.

mod charts;
mod config;
mod dashboard;
mod data;
mod export;
mod gui;
mod stats;

use anyhow::{anyhow, Context};
use clap::Parser;
use config::DashboardConfig;
use dashboard::Dashboard;
use eframe::egui;
use export::export_dashboard;
use gui::ClimateDashboardApp;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "climate-dashboard",
    version,
    about = "Annual climate statistics dashboard"
)]
struct Cli {
    /// Spreadsheet with one record per year (xlsx, xls, ods or csv)
    input: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// First year of the anomaly baseline
    #[arg(long)]
    baseline_start: Option<i64>,

    /// Last year of the anomaly baseline
    #[arg(long)]
    baseline_end: Option<i64>,

    /// Number of humidity histogram bins
    #[arg(long)]
    bins: Option<usize>,

    /// Write PNG charts and summary.json to DIR instead of opening a window
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
}

impl Cli {
    /// Defaults, then the JSON file, then flags.
    fn resolve_config(&self) -> anyhow::Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::from_json_file(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(start) = self.baseline_start {
            config.baseline_start = start;
        }
        if let Some(end) = self.baseline_end {
            config.baseline_end = end;
        }
        if let Some(bins) = self.bins {
            config.histogram_bins = bins;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run_export(config: &DashboardConfig, dir: &Path) -> anyhow::Result<()> {
    let dashboard = Dashboard::load(config)
        .with_context(|| format!("loading {}", config.input.display()))?;
    let report = export_dashboard(&dashboard, config, dir)?;
    info!(
        "{} charts written, {} views skipped, summary in {}",
        report.charts.len(),
        report.skipped.len(),
        report.summary.display()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    if let Some(dir) = &cli.export {
        return run_export(&config, dir);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title(&config.title),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(|cc| Ok(Box::new(ClimateDashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!(e.to_string()))
}
