//! Dashboard Configuration
//! Defaults, optional JSON settings file, command line overrides.

use crate::stats::BaselineWindow;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "Data_Tahunan_SUMSEL.xlsx";
pub const DEFAULT_TITLE: &str = "Dashboard Analisis Iklim Sumatera Selatan";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Spreadsheet with one record per year.
    pub input: PathBuf,
    pub title: String,
    pub baseline_start: i64,
    pub baseline_end: i64,
    pub histogram_bins: usize,
    /// Size of exported PNG charts.
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let window = BaselineWindow::default();
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            title: DEFAULT_TITLE.to_string(),
            baseline_start: window.start,
            baseline_end: window.end,
            histogram_bins: 20,
            chart_width: 1200,
            chart_height: 600,
        }
    }
}

impl DashboardConfig {
    /// Read settings from a JSON file; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.baseline_start <= self.baseline_end,
            "baseline start {} is after baseline end {}",
            self.baseline_start,
            self.baseline_end
        );
        ensure!(self.histogram_bins >= 1, "histogram needs at least one bin");
        ensure!(
            self.chart_width >= 200 && self.chart_height >= 150,
            "chart size {}x{} is too small",
            self.chart_width,
            self.chart_height
        );
        Ok(())
    }

    pub fn baseline_window(&self) -> BaselineWindow {
        BaselineWindow {
            start: self.baseline_start,
            end: self.baseline_end,
        }
    }
}
