//! Dashboard Pipeline
//! Load, derive and build every view in one pass.

use crate::charts::{DashboardView, ViewBuilder, ViewContent};
use crate::config::DashboardConfig;
use crate::data::{ClimateTable, DataLoader, LoaderError};
use crate::stats::{Baseline, CorrelationMatrix, DecadeAverage, ExtremeSummary};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One loaded spreadsheet and the views built from it.
#[derive(Debug)]
pub struct Dashboard {
    pub source: PathBuf,
    pub table: ClimateTable,
    pub views: Vec<DashboardView>,
}

/// Headline numbers written next to exported charts.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub source: String,
    pub records: usize,
    pub first_year: Option<i64>,
    pub last_year: Option<i64>,
    pub baseline: Option<Baseline>,
    pub extremes: Option<ExtremeSummary>,
    pub decades: Vec<DecadeAverage>,
    pub correlation: Option<CorrelationMatrix>,
    pub errors: Vec<ViewError>,
}

#[derive(Debug, Serialize)]
pub struct ViewError {
    pub view: &'static str,
    pub message: String,
}

impl Dashboard {
    /// Run the whole pipeline from disk.
    pub fn load(config: &DashboardConfig) -> Result<Self, LoaderError> {
        let table = DataLoader::load(&config.input)?;
        let builder = ViewBuilder::new(config.baseline_window(), config.histogram_bins);
        Ok(Self::from_table(&config.input, table, &builder))
    }

    pub fn from_table(source: &Path, table: ClimateTable, builder: &ViewBuilder) -> Self {
        let views = builder.build_all(&table);
        let failed = views.iter().filter(|v| v.is_error()).count();
        info!(
            "Built {} views from {} records ({} unavailable)",
            views.len(),
            table.height(),
            failed
        );
        Self {
            source: source.to_path_buf(),
            table,
            views,
        }
    }

    pub fn records(&self) -> usize {
        self.table.height()
    }

    pub fn summary(&self) -> DashboardSummary {
        let years = self.table.years();
        let mut summary = DashboardSummary {
            source: self.source.display().to_string(),
            records: self.records(),
            first_year: years.first().copied(),
            last_year: years.last().copied(),
            baseline: None,
            extremes: None,
            decades: Vec::new(),
            correlation: None,
            errors: Vec::new(),
        };

        for view in &self.views {
            match &view.content {
                Ok(ViewContent::Anomaly { baseline, .. }) => summary.baseline = Some(*baseline),
                Ok(ViewContent::Extremes(extremes)) => summary.extremes = Some(*extremes),
                Ok(ViewContent::Decades(decades)) => summary.decades = decades.clone(),
                Ok(ViewContent::Heatmap(matrix)) => summary.correlation = Some(matrix.clone()),
                Ok(_) => {}
                Err(e) => summary.errors.push(ViewError {
                    view: view.kind.slug(),
                    message: e.to_string(),
                }),
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::Dashboard;
    use crate::charts::ViewBuilder;
    use crate::data::ClimateTable;
    use polars::prelude::*;
    use std::path::Path;

    fn table(years: &[i64], suhu: &[f64]) -> ClimateTable {
        let n = years.len();
        let df = df!(
            "Tahun" => years,
            "Suhu" => suhu,
            "Suhu_Max" => vec![32.0; n],
            "Suhu_Min" => vec![22.5; n],
            "Curah_Hujan" => (0..n).map(|i| 2000.0 + i as f64 * 90.0).collect::<Vec<_>>(),
            "kelembaban" => (0..n).map(|i| 80.0 + i as f64).collect::<Vec<_>>(),
        )
        .unwrap();
        ClimateTable::from_dataframe(df).unwrap()
    }

    #[test]
    fn test_summary_collects_headlines() {
        let dashboard = Dashboard::from_table(
            Path::new("sumsel.xlsx"),
            table(&[1990, 1991, 1992], &[26.0, 28.0, 27.0]),
            &ViewBuilder::default(),
        );
        let summary = dashboard.summary();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.first_year, Some(1990));
        assert_eq!(summary.last_year, Some(1992));
        assert!((summary.baseline.unwrap().mean - 27.0).abs() < 1e-9);
        assert_eq!(summary.extremes.unwrap().hottest.year, 1991);
        assert_eq!(summary.decades.len(), 1);
        assert!(summary.correlation.is_some());
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn test_summary_lists_unavailable_views() {
        let dashboard = Dashboard::from_table(
            Path::new("sumsel.xlsx"),
            table(&[1960, 1961, 2020], &[26.0, 26.5, 27.5]),
            &ViewBuilder::default(),
        );
        let summary = dashboard.summary();

        assert!(summary.baseline.is_none());
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].view, "anomali_suhu");
        assert!(summary.errors[0].message.contains("Insufficient baseline"));

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"records\":3"));
    }
}
