//! Dashboard Views Module
//! Builds the backend-neutral data behind every dashboard view.
//!
//! Each view is computed from the table on its own; a failing view carries
//! its error and does not affect the others.

use crate::data::{
    ClimateTable, DataProcessor, TableData, ANOMALI_SUHU, CURAH_HUJAN, KECEPATAN_ANGIN,
    KELEMBABAN, MATAHARI, RENTANG_SUHU, SUHU,
};
use crate::stats::{
    Baseline, BaselineWindow, CorrelationMatrix, DecadeAverage, ExtremeSummary, Histogram,
    LinearFit, StatsCalculator, StatsError,
};
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    RawTable,
    Temperature,
    Rainfall,
    TemperatureRange,
    Anomaly,
    TemperatureVsRainfall,
    DecadeAverages,
    Extremes,
    HumidityDistribution,
    Humidity,
    Sunshine,
    WindSpeed,
    Correlation,
}

impl ViewKind {
    pub const ALL: [ViewKind; 13] = [
        ViewKind::RawTable,
        ViewKind::Temperature,
        ViewKind::Rainfall,
        ViewKind::TemperatureRange,
        ViewKind::Anomaly,
        ViewKind::TemperatureVsRainfall,
        ViewKind::DecadeAverages,
        ViewKind::Extremes,
        ViewKind::HumidityDistribution,
        ViewKind::Humidity,
        ViewKind::Sunshine,
        ViewKind::WindSpeed,
        ViewKind::Correlation,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::RawTable => "Data Iklim",
            ViewKind::Temperature => "Tren Suhu Rata-rata Tahunan",
            ViewKind::Rainfall => "Curah Hujan Tahunan",
            ViewKind::TemperatureRange => "Rentang Suhu Tahunan (Max - Min)",
            ViewKind::Anomaly => "Anomali Suhu terhadap Rata-rata Baseline",
            ViewKind::TemperatureVsRainfall => "Korelasi Suhu vs Curah Hujan",
            ViewKind::DecadeAverages => "Rata-rata Suhu & Curah Hujan per Dekade",
            ViewKind::Extremes => "Tahun Ekstrem",
            ViewKind::HumidityDistribution => "Distribusi Kelembaban Tahunan",
            ViewKind::Humidity => "Kelembaban Tahunan",
            ViewKind::Sunshine => "Durasi Penyinaran Matahari",
            ViewKind::WindSpeed => "Kecepatan Angin Tahunan",
            ViewKind::Correlation => "Korelasi Antar Variabel Iklim",
        }
    }

    /// 1-based position in the full dashboard, independent of which
    /// optional columns are present.
    pub fn number(&self) -> usize {
        ViewKind::ALL
            .iter()
            .position(|kind| kind == self)
            .map_or(0, |i| i + 1)
    }

    /// File-name friendly identifier.
    pub fn slug(&self) -> &'static str {
        match self {
            ViewKind::RawTable => "data",
            ViewKind::Temperature => "suhu",
            ViewKind::Rainfall => "curah_hujan",
            ViewKind::TemperatureRange => "rentang_suhu",
            ViewKind::Anomaly => "anomali_suhu",
            ViewKind::TemperatureVsRainfall => "suhu_vs_hujan",
            ViewKind::DecadeAverages => "dekade",
            ViewKind::Extremes => "ekstrem",
            ViewKind::HumidityDistribution => "distribusi_kelembaban",
            ViewKind::Humidity => "kelembaban",
            ViewKind::Sunshine => "matahari",
            ViewKind::WindSpeed => "kecepatan_angin",
            ViewKind::Correlation => "korelasi",
        }
    }

    /// Column whose presence gates this view, if any.
    pub fn required_optional_column(&self) -> Option<&'static str> {
        match self {
            ViewKind::Sunshine => Some(MATAHARI),
            ViewKind::WindSpeed => Some(KECEPATAN_ANGIN),
            _ => None,
        }
    }
}

/// A metric plotted against `Tahun`.
#[derive(Debug, Clone, PartialEq)]
pub struct YearSeries {
    pub name: String,
    pub unit: &'static str,
    pub points: Vec<[f64; 2]>,
}

impl YearSeries {
    fn from_pairs(name: &str, unit: &'static str, pairs: Vec<(i64, f64)>) -> Self {
        Self {
            name: name.to_string(),
            unit,
            points: pairs.into_iter().map(|(y, v)| [y as f64, v]).collect(),
        }
    }

    /// Inclusive `(min, max)` of the values, `None` when empty.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, p| match acc {
            Some((lo, hi)) => Some((f64::min(lo, p[1]), f64::max(hi, p[1]))),
            None => Some((p[1], p[1])),
        })
    }

    /// Inclusive `(first, last)` year, `None` when empty.
    pub fn year_range(&self) -> Option<(f64, f64)> {
        Some((self.points.first()?[0], self.points.last()?[0]))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewContent {
    Table(TableData),
    Line(YearSeries),
    Bars(YearSeries),
    Anomaly {
        series: YearSeries,
        baseline: Baseline,
    },
    Scatter {
        points: Vec<[f64; 2]>,
        fit: LinearFit,
    },
    Decades(Vec<DecadeAverage>),
    Extremes(ExtremeSummary),
    Histogram {
        histogram: Histogram,
        density: Option<Vec<[f64; 2]>>,
    },
    Heatmap(CorrelationMatrix),
}

/// One entry of the dashboard.
#[derive(Debug)]
pub struct DashboardView {
    pub kind: ViewKind,
    pub content: Result<ViewContent, StatsError>,
}

impl DashboardView {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }

    pub fn is_error(&self) -> bool {
        self.content.is_err()
    }
}

/// Builds dashboard views from a loaded table.
#[derive(Debug, Clone, Copy)]
pub struct ViewBuilder {
    pub baseline_window: BaselineWindow,
    pub histogram_bins: usize,
}

impl Default for ViewBuilder {
    fn default() -> Self {
        Self {
            baseline_window: BaselineWindow::default(),
            histogram_bins: 20,
        }
    }
}

impl ViewBuilder {
    pub fn new(baseline_window: BaselineWindow, histogram_bins: usize) -> Self {
        Self {
            baseline_window,
            histogram_bins,
        }
    }

    /// Build every view the table supports, in dashboard order.
    ///
    /// Views gated by an absent optional column are skipped.
    pub fn build_all(&self, table: &ClimateTable) -> Vec<DashboardView> {
        ViewKind::ALL
            .iter()
            .filter(|kind| match kind.required_optional_column() {
                Some(column) if !table.has_column(column) => {
                    debug!("{} not present; skipping {:?}", column, kind);
                    false
                }
                _ => true,
            })
            .map(|&kind| self.build(kind, table))
            .collect()
    }

    pub fn build(&self, kind: ViewKind, table: &ClimateTable) -> DashboardView {
        let content = match kind {
            ViewKind::RawTable => Self::raw_table(table),
            ViewKind::Temperature => Self::line(table, SUHU, "°C"),
            ViewKind::Rainfall => Self::bars(table, CURAH_HUJAN, "mm"),
            ViewKind::TemperatureRange => Self::temperature_range(table),
            ViewKind::Anomaly => self.anomaly(table),
            ViewKind::TemperatureVsRainfall => Self::temperature_vs_rainfall(table),
            ViewKind::DecadeAverages => {
                StatsCalculator::decade_averages(table).map(ViewContent::Decades)
            }
            ViewKind::Extremes => StatsCalculator::extremes(table).map(ViewContent::Extremes),
            ViewKind::HumidityDistribution => self.humidity_distribution(table),
            ViewKind::Humidity => Self::line(table, KELEMBABAN, "%"),
            ViewKind::Sunshine => Self::line(table, MATAHARI, "jam"),
            ViewKind::WindSpeed => Self::line(table, KECEPATAN_ANGIN, "m/s"),
            ViewKind::Correlation => self.correlation(table),
        };

        if let Err(e) = &content {
            warn!("View '{}' unavailable: {}", kind.title(), e);
        }

        DashboardView { kind, content }
    }

    fn non_empty(table: &ClimateTable) -> Result<(), StatsError> {
        if table.height() == 0 {
            Err(StatsError::EmptyTable)
        } else {
            Ok(())
        }
    }

    fn year_series(
        table: &ClimateTable,
        column: &str,
        unit: &'static str,
    ) -> Result<YearSeries, StatsError> {
        Self::non_empty(table)?;
        let pairs = table.year_series(column)?;
        if pairs.is_empty() {
            return Err(StatsError::NoValues(column.to_string()));
        }
        Ok(YearSeries::from_pairs(column, unit, pairs))
    }

    fn raw_table(table: &ClimateTable) -> Result<ViewContent, StatsError> {
        Self::non_empty(table)?;
        Ok(ViewContent::Table(TableData::from_dataframe(
            table.dataframe(),
        )))
    }

    fn line(table: &ClimateTable, column: &str, unit: &'static str) -> Result<ViewContent, StatsError> {
        Self::year_series(table, column, unit).map(ViewContent::Line)
    }

    fn bars(table: &ClimateTable, column: &str, unit: &'static str) -> Result<ViewContent, StatsError> {
        Self::year_series(table, column, unit).map(ViewContent::Bars)
    }

    fn temperature_range(table: &ClimateTable) -> Result<ViewContent, StatsError> {
        Self::non_empty(table)?;
        let with_range = table.with_column(DataProcessor::temperature_range_column(table)?)?;
        Self::line(&with_range, RENTANG_SUHU, "°C")
    }

    fn anomaly(&self, table: &ClimateTable) -> Result<ViewContent, StatsError> {
        Self::non_empty(table)?;
        let baseline = StatsCalculator::compute_baseline(table, self.baseline_window)?;
        let anomalies = StatsCalculator::anomalies(&table.values(SUHU)?, &baseline);
        let pairs = table
            .years()
            .into_iter()
            .zip(anomalies)
            .filter_map(|(year, a)| a.map(|a| (year, a)))
            .collect();

        Ok(ViewContent::Anomaly {
            series: YearSeries::from_pairs(ANOMALI_SUHU, "°C", pairs),
            baseline,
        })
    }

    fn temperature_vs_rainfall(table: &ClimateTable) -> Result<ViewContent, StatsError> {
        Self::non_empty(table)?;
        let suhu = table.values(SUHU)?;
        let rain = table.values(CURAH_HUJAN)?;
        let fit = LinearFit::from_pairs(&suhu, &rain)?;

        let points = suhu
            .iter()
            .zip(rain.iter())
            .filter_map(|(t, r)| Some([(*t)?, (*r)?]))
            .collect();

        Ok(ViewContent::Scatter { points, fit })
    }

    fn humidity_distribution(&self, table: &ClimateTable) -> Result<ViewContent, StatsError> {
        Self::non_empty(table)?;
        let values: Vec<f64> = table.values(KELEMBABAN)?.into_iter().flatten().collect();
        let histogram = Histogram::from_values(&values, self.histogram_bins, KELEMBABAN)?;
        let density = histogram.density_curve(&values);
        Ok(ViewContent::Histogram { histogram, density })
    }

    fn correlation(&self, table: &ClimateTable) -> Result<ViewContent, StatsError> {
        Self::non_empty(table)?;
        let enriched = DataProcessor::with_derived_columns(table, self.baseline_window)?;
        CorrelationMatrix::from_table(&enriched).map(ViewContent::Heatmap)
    }
}
