//! Statistics Calculator Module
//! Handles temperature range, baseline anomaly, decade averages and extreme years.

use crate::data::{ClimateTable, CURAH_HUJAN, SUHU, TAHUN};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Insufficient baseline data: no Suhu values for {start}-{end}")]
    InsufficientBaseline { start: i64, end: i64 },
    #[error("Table has no records")]
    EmptyTable,
    #[error("Column {0} has no values")]
    NoValues(String),
    #[error("Cannot fit trend line: {0}")]
    DegenerateFit(&'static str),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Inclusive range of years that defines the anomaly zero-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineWindow {
    pub start: i64,
    pub end: i64,
}

impl Default for BaselineWindow {
    fn default() -> Self {
        Self {
            start: 1981,
            end: 2010,
        }
    }
}

/// Mean `Suhu` over the baseline window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Baseline {
    pub window: BaselineWindow,
    pub mean: f64,
    pub records: usize,
}

/// Mean temperature and rainfall of one decade, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecadeAverage {
    pub decade: i64,
    pub suhu: Option<f64>,
    pub curah_hujan: Option<f64>,
    pub years: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extreme {
    pub year: i64,
    pub value: f64,
}

/// Hottest/coldest and wettest/driest years.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtremeSummary {
    pub hottest: Extreme,
    pub coldest: Extreme,
    pub wettest: Extreme,
    pub driest: Extreme,
}

/// One labelled line of the extremes summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremeEntry {
    pub label: &'static str,
    pub extreme: Extreme,
    pub unit: &'static str,
    pub decimals: usize,
}

impl ExtremeEntry {
    pub fn formatted_value(&self) -> String {
        format!("{:.*} {}", self.decimals, self.extreme.value, self.unit)
    }
}

impl fmt::Display for ExtremeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.label,
            self.extreme.year,
            self.formatted_value()
        )
    }
}

impl ExtremeSummary {
    pub fn entries(&self) -> [ExtremeEntry; 4] {
        [
            ExtremeEntry {
                label: "Tahun Terpanas",
                extreme: self.hottest,
                unit: "°C",
                decimals: 2,
            },
            ExtremeEntry {
                label: "Tahun Terdingin",
                extreme: self.coldest,
                unit: "°C",
                decimals: 2,
            },
            ExtremeEntry {
                label: "Hujan Terbanyak",
                extreme: self.wettest,
                unit: "mm",
                decimals: 1,
            },
            ExtremeEntry {
                label: "Hujan Terkering",
                extreme: self.driest,
                unit: "mm",
                decimals: 1,
            },
        ]
    }
}

/// Pure computations over a [`ClimateTable`].
pub struct StatsCalculator;

impl StatsCalculator {
    /// Elementwise `max - min`; missing when either side is missing.
    pub fn temperature_range(max: &[Option<f64>], min: &[Option<f64>]) -> Vec<Option<f64>> {
        max.iter()
            .zip(min.iter())
            .map(|(hi, lo)| match (hi, lo) {
                (Some(hi), Some(lo)) => Some(hi - lo),
                _ => None,
            })
            .collect()
    }

    /// Mean `Suhu` of the records inside `window`.
    ///
    /// Fails with [`StatsError::InsufficientBaseline`] when the window holds
    /// no temperature values.
    pub fn compute_baseline(
        table: &ClimateTable,
        window: BaselineWindow,
    ) -> Result<Baseline, StatsError> {
        let values: Vec<f64> = table
            .dataframe()
            .clone()
            .lazy()
            .filter(
                col(TAHUN)
                    .gt_eq(lit(window.start))
                    .and(col(TAHUN).lt_eq(lit(window.end))),
            )
            .select([col(SUHU)])
            .collect()?
            .column(SUHU)?
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();

        if values.is_empty() {
            return Err(StatsError::InsufficientBaseline {
                start: window.start,
                end: window.end,
            });
        }

        Ok(Baseline {
            window,
            mean: values.iter().mean(),
            records: values.len(),
        })
    }

    /// Deviation of each value from the baseline mean.
    pub fn anomalies(values: &[Option<f64>], baseline: &Baseline) -> Vec<Option<f64>> {
        values
            .iter()
            .map(|v| v.map(|v| v - baseline.mean))
            .collect()
    }

    /// `floor(year / 10) * 10`
    pub fn decade_of(year: i64) -> i64 {
        year.div_euclid(10) * 10
    }

    /// Halves round to the even neighbour.
    pub fn round_to(value: f64, decimals: i32) -> f64 {
        let factor = 10f64.powi(decimals);
        (value * factor).round_ties_even() / factor
    }

    /// Mean `Suhu` and `Curah_Hujan` per decade, ordered by decade.
    pub fn decade_averages(table: &ClimateTable) -> Result<Vec<DecadeAverage>, StatsError> {
        if table.height() == 0 {
            return Err(StatsError::EmptyTable);
        }

        let suhu = table.values(SUHU)?;
        let rain = table.values(CURAH_HUJAN)?;

        let mut groups: BTreeMap<i64, (Vec<f64>, Vec<f64>, usize)> = BTreeMap::new();
        for ((year, t), r) in table.years().into_iter().zip(suhu).zip(rain) {
            let entry = groups.entry(Self::decade_of(year)).or_default();
            entry.0.extend(t);
            entry.1.extend(r);
            entry.2 += 1;
        }

        let rounded_mean = |values: &[f64]| {
            if values.is_empty() {
                None
            } else {
                Some(Self::round_to(values.iter().mean(), 2))
            }
        };

        Ok(groups
            .into_iter()
            .map(|(decade, (t, r, years))| DecadeAverage {
                decade,
                suhu: rounded_mean(&t),
                curah_hujan: rounded_mean(&r),
                years,
            })
            .collect())
    }

    /// First record holding the largest value.
    pub fn arg_max(series: &[(i64, f64)]) -> Option<Extreme> {
        Self::arg_best(series, |candidate, best| candidate > best)
    }

    /// First record holding the smallest value.
    pub fn arg_min(series: &[(i64, f64)]) -> Option<Extreme> {
        Self::arg_best(series, |candidate, best| candidate < best)
    }

    fn arg_best(series: &[(i64, f64)], better: impl Fn(f64, f64) -> bool) -> Option<Extreme> {
        series.iter().fold(None, |best: Option<Extreme>, &(year, value)| match best {
            Some(b) if !better(value, b.value) => Some(b),
            _ => Some(Extreme { year, value }),
        })
    }

    /// Extreme years for temperature and rainfall.
    pub fn extremes(table: &ClimateTable) -> Result<ExtremeSummary, StatsError> {
        if table.height() == 0 {
            return Err(StatsError::EmptyTable);
        }

        let suhu = table.year_series(SUHU)?;
        let rain = table.year_series(CURAH_HUJAN)?;
        let no_values = |name: &str| StatsError::NoValues(name.to_string());

        Ok(ExtremeSummary {
            hottest: Self::arg_max(&suhu).ok_or_else(|| no_values(SUHU))?,
            coldest: Self::arg_min(&suhu).ok_or_else(|| no_values(SUHU))?,
            wettest: Self::arg_max(&rain).ok_or_else(|| no_values(CURAH_HUJAN))?,
            driest: Self::arg_min(&rain).ok_or_else(|| no_values(CURAH_HUJAN))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{BaselineWindow, StatsCalculator, StatsError};
    use crate::data::ClimateTable;
    use polars::prelude::*;

    fn table(years: &[i64], suhu: &[f64], rain: &[f64]) -> ClimateTable {
        let n = years.len();
        let df = df!(
            "Tahun" => years,
            "Suhu" => suhu,
            "Suhu_Max" => vec![32.0; n],
            "Suhu_Min" => vec![22.0; n],
            "Curah_Hujan" => rain,
            "kelembaban" => vec![84.0; n],
        )
        .unwrap();
        ClimateTable::from_dataframe(df).unwrap()
    }

    #[test]
    fn test_temperature_range() {
        let max = [Some(32.5), Some(33.0), None];
        let min = [Some(22.0), Some(23.5), Some(21.0)];
        let range = StatsCalculator::temperature_range(&max, &min);
        assert_eq!(range, vec![Some(10.5), Some(9.5), None]);
    }

    #[test]
    fn test_baseline_uses_window_only() {
        let t = table(
            &[1975, 1981, 1995, 2010, 2020],
            &[20.0, 26.0, 27.0, 28.0, 40.0],
            &[2000.0; 5],
        );
        let baseline = StatsCalculator::compute_baseline(&t, BaselineWindow::default()).unwrap();
        assert!((baseline.mean - 27.0).abs() < 1e-9);
        assert_eq!(baseline.records, 3);

        // Changing records outside the window leaves the baseline untouched
        let shifted = table(
            &[1975, 1981, 1995, 2010, 2020],
            &[10.0, 26.0, 27.0, 28.0, 15.0],
            &[2000.0; 5],
        );
        let again = StatsCalculator::compute_baseline(&shifted, BaselineWindow::default()).unwrap();
        assert_eq!(baseline.mean, again.mean);
    }

    #[test]
    fn test_insufficient_baseline() {
        let t = table(&[1970, 1975, 2015], &[26.0, 26.5, 27.5], &[2000.0; 3]);
        let result = StatsCalculator::compute_baseline(&t, BaselineWindow::default());
        assert!(matches!(
            result,
            Err(StatsError::InsufficientBaseline {
                start: 1981,
                end: 2010
            })
        ));
    }

    #[test]
    fn test_anomalies() {
        let t = table(&[1990, 2000], &[26.0, 28.0], &[2000.0; 2]);
        let baseline = StatsCalculator::compute_baseline(&t, BaselineWindow::default()).unwrap();
        let anomalies = StatsCalculator::anomalies(&[Some(26.0), Some(28.0), None], &baseline);
        assert_eq!(anomalies, vec![Some(-1.0), Some(1.0), None]);
    }

    #[test]
    fn test_decade_of() {
        for year in [1981, 1985, 1989] {
            assert_eq!(StatsCalculator::decade_of(year), 1980);
        }
        assert_eq!(StatsCalculator::decade_of(1990), 1990);
        assert_eq!(StatsCalculator::decade_of(2009), 2000);
    }

    #[test]
    fn test_decade_averages_rounded() {
        let t = table(
            &[1981, 1985, 1989, 1990],
            &[26.0, 26.5, 26.6, 27.0],
            &[2000.0, 2100.0, 2200.01, 1800.0],
        );
        let decades = StatsCalculator::decade_averages(&t).unwrap();
        assert_eq!(decades.len(), 2);
        assert_eq!(decades[0].decade, 1980);
        assert_eq!(decades[0].years, 3);
        // (26.0 + 26.5 + 26.6) / 3 = 26.3666..
        assert_eq!(decades[0].suhu, Some(26.37));
        assert_eq!(decades[0].curah_hujan, Some(2100.0));
        assert_eq!(decades[1].decade, 1990);
        assert_eq!(decades[1].suhu, Some(27.0));
    }

    #[test]
    fn test_decade_average_halves_round_to_even() {
        let t = table(&[1990, 1991], &[26.0, 26.25], &[2000.0, 2000.25]);
        let decades = StatsCalculator::decade_averages(&t).unwrap();
        // 26.125 and 2000.125 sit exactly on the half
        assert_eq!(decades[0].suhu, Some(26.12));
        assert_eq!(decades[0].curah_hujan, Some(2000.12));
    }

    #[test]
    fn test_hottest_year() {
        let t = table(&[1990, 1991, 1992], &[26.0, 28.0, 27.0], &[2400.0, 2100.0, 2600.0]);
        let summary = StatsCalculator::extremes(&t).unwrap();
        assert_eq!(summary.hottest.year, 1991);
        assert_eq!(summary.coldest.year, 1990);
        assert_eq!(summary.wettest.year, 1992);
        assert_eq!(summary.driest.year, 1991);

        let entries = summary.entries();
        assert_eq!(entries[0].formatted_value(), "28.00 °C");
        assert_eq!(entries[0].to_string(), "Tahun Terpanas: 1991 (28.00 °C)");
        assert_eq!(entries[2].formatted_value(), "2600.0 mm");
    }

    #[test]
    fn test_extreme_ties_take_first_occurrence() {
        let series = [(2000, 27.0), (2001, 28.0), (2002, 28.0), (2003, 26.0), (2004, 26.0)];
        assert_eq!(StatsCalculator::arg_max(&series).unwrap().year, 2001);
        assert_eq!(StatsCalculator::arg_min(&series).unwrap().year, 2003);
        assert!(StatsCalculator::arg_max(&[]).is_none());
    }
}
