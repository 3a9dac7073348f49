//! Data Processor Module
//! Adds the derived columns (range, anomaly, decade) to a loaded table.

use crate::data::{
    ClimateTable, ANOMALI_SUHU, DEKADE, RENTANG_SUHU, SUHU, SUHU_MAX, SUHU_MIN,
};
use crate::stats::{Baseline, BaselineWindow, StatsCalculator, StatsError};
use log::warn;
use polars::prelude::*;

/// Builds derived columns without touching the source table.
pub struct DataProcessor;

impl DataProcessor {
    /// `Rentang_Suhu = Suhu_Max - Suhu_Min`
    pub fn temperature_range_column(table: &ClimateTable) -> Result<Column, StatsError> {
        let max = table.values(SUHU_MAX)?;
        let min = table.values(SUHU_MIN)?;
        let range = StatsCalculator::temperature_range(&max, &min);
        Ok(Column::new(RENTANG_SUHU.into(), range))
    }

    /// `Anomali_Suhu = Suhu - baseline`
    pub fn anomaly_column(table: &ClimateTable, baseline: &Baseline) -> Result<Column, StatsError> {
        let suhu = table.values(SUHU)?;
        let anomalies = StatsCalculator::anomalies(&suhu, baseline);
        Ok(Column::new(ANOMALI_SUHU.into(), anomalies))
    }

    /// `Dekade = floor(Tahun / 10) * 10`
    pub fn decade_column(table: &ClimateTable) -> Column {
        let decades: Vec<i64> = table
            .years()
            .into_iter()
            .map(StatsCalculator::decade_of)
            .collect();
        Column::new(DEKADE.into(), decades)
    }

    /// Table with all three derived columns.
    ///
    /// When the baseline window holds no data the anomaly column is left out
    /// instead of being filled with NaN.
    pub fn with_derived_columns(
        table: &ClimateTable,
        window: BaselineWindow,
    ) -> Result<ClimateTable, StatsError> {
        let mut enriched = table.with_column(Self::temperature_range_column(table)?)?;

        match StatsCalculator::compute_baseline(table, window) {
            Ok(baseline) => {
                enriched = enriched.with_column(Self::anomaly_column(table, &baseline)?)?;
            }
            Err(StatsError::InsufficientBaseline { start, end }) => {
                warn!("No records between {} and {}; {} omitted", start, end, ANOMALI_SUHU);
            }
            Err(e) => return Err(e),
        }

        Ok(enriched.with_column(Self::decade_column(table))?)
    }
}

#[cfg(test)]
mod tests {
    use super::DataProcessor;
    use crate::data::{ClimateTable, ANOMALI_SUHU, DEKADE, RENTANG_SUHU, SUHU};
    use crate::stats::BaselineWindow;
    use polars::prelude::*;

    fn table(years: &[i64]) -> ClimateTable {
        let n = years.len();
        let suhu: Vec<f64> = (0..n).map(|i| 26.0 + i as f64 * 0.5).collect();
        let df = df!(
            "Tahun" => years,
            "Suhu" => suhu,
            "Suhu_Max" => vec![32.5; n],
            "Suhu_Min" => vec![22.0; n],
            "Curah_Hujan" => vec![2500.0; n],
            "kelembaban" => vec![84.0; n],
        )
        .unwrap();
        ClimateTable::from_dataframe(df).unwrap()
    }

    #[test]
    fn test_derived_columns_added() {
        let source = table(&[1985, 1995, 2005]);
        let enriched = DataProcessor::with_derived_columns(&source, BaselineWindow::default()).unwrap();

        let range = enriched.values(RENTANG_SUHU).unwrap();
        assert!(range.iter().all(|v| *v == Some(10.5)));

        let suhu = enriched.values(SUHU).unwrap();
        let anomaly = enriched.values(ANOMALI_SUHU).unwrap();
        // baseline = 26.5
        for (t, a) in suhu.iter().zip(anomaly.iter()) {
            assert!((t.unwrap() - 26.5 - a.unwrap()).abs() < 1e-9);
        }

        let decades = enriched.dataframe().column(DEKADE).unwrap().i64().unwrap().clone();
        let decades: Vec<i64> = decades.into_iter().flatten().collect();
        assert_eq!(decades, vec![1980, 1990, 2000]);

        // The source table is left untouched
        assert!(!source.has_column(RENTANG_SUHU));
    }

    #[test]
    fn test_anomaly_omitted_without_baseline() {
        let source = table(&[1960, 1970, 2020]);
        let enriched = DataProcessor::with_derived_columns(&source, BaselineWindow::default()).unwrap();
        assert!(enriched.has_column(RENTANG_SUHU));
        assert!(enriched.has_column(DEKADE));
        assert!(!enriched.has_column(ANOMALI_SUHU));
    }
}
