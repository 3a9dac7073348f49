//! Dashboard Export
//! Writes every available view as PNG plus a JSON summary.

use crate::charts::{RenderError, StaticChartRenderer, ViewKind};
use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.json";

/// Files written by one export run.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub charts: Vec<PathBuf>,
    pub skipped: Vec<&'static str>,
    pub summary: PathBuf,
}

/// `NN_<slug>.png`, numbered by the view's place in the full dashboard.
pub fn chart_file_name(kind: ViewKind) -> String {
    format!("{:02}_{}.png", kind.number(), kind.slug())
}

pub fn export_dashboard(
    dashboard: &Dashboard,
    config: &DashboardConfig,
    dir: &Path,
) -> Result<ExportReport, RenderError> {
    fs::create_dir_all(dir)?;
    let mut report = ExportReport::default();

    for view in &dashboard.views {
        if let Err(e) = &view.content {
            warn!("Skipping '{}': {}", view.title(), e);
            report.skipped.push(view.kind.slug());
            continue;
        }

        let png = StaticChartRenderer::render_view_to_png(
            view,
            config.chart_width,
            config.chart_height,
        )?;
        let path = dir.join(chart_file_name(view.kind));
        fs::write(&path, png)?;
        info!("Wrote {}", path.display());
        report.charts.push(path);
    }

    let summary_path = dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(&dashboard.summary())?;
    fs::write(&summary_path, json)?;
    info!(
        "Exported {} charts and {} to {}",
        report.charts.len(),
        SUMMARY_FILE,
        dir.display()
    );
    report.summary = summary_path;

    Ok(report)
}
