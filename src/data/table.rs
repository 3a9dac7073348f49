//! Climate Table Module
//! Validated, year-ordered wrapper around the loaded DataFrame.

use crate::data::{LoaderError, OPTIONAL_COLUMNS, REQUIRED_COLUMNS, TAHUN};
use polars::prelude::*;
use std::collections::HashSet;

/// One record per year, sorted by `Tahun` ascending.
///
/// Measurement columns are `Float64` and `Tahun` is `Int64`. The table is
/// never mutated in place; derived columns produce a new table.
#[derive(Debug, Clone)]
pub struct ClimateTable {
    df: DataFrame,
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

impl ClimateTable {
    /// Validate a renamed DataFrame and order it by year.
    ///
    /// Rejects missing required columns, empty tables, non-numeric
    /// measurements, missing years and duplicate years.
    pub fn from_dataframe(mut df: DataFrame) -> Result<Self, LoaderError> {
        for name in REQUIRED_COLUMNS {
            if df.column(name).is_err() {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }

        if df.height() == 0 {
            return Err(LoaderError::EmptyTable);
        }

        let measurements = REQUIRED_COLUMNS
            .iter()
            .filter(|name| **name != TAHUN)
            .chain(OPTIONAL_COLUMNS.iter());
        for name in measurements {
            let Ok(column) = df.column(name) else {
                continue;
            };
            // A column with no values at all is read as text by the CSV reader
            let all_null = column.null_count() == column.len();
            if !is_numeric(column.dtype()) && !all_null {
                return Err(LoaderError::NonNumericColumn(name.to_string()));
            }
            let as_float = column.cast(&DataType::Float64)?;
            df.with_column(as_float)?;
        }

        let years = df.column(TAHUN)?;
        if !is_numeric(years.dtype()) {
            return Err(LoaderError::NonNumericColumn(TAHUN.to_string()));
        }
        let years = years.cast(&DataType::Int64)?;

        let mut seen = HashSet::new();
        for (row, year) in years.i64()?.into_iter().enumerate() {
            let year = year.ok_or(LoaderError::MissingYear { row: row + 1 })?;
            if !seen.insert(year) {
                return Err(LoaderError::DuplicateYear(year));
            }
        }
        df.with_column(years)?;

        let df = df.sort([TAHUN], SortMultipleOptions::default())?;
        Ok(Self { df })
    }

    /// Get a reference to the underlying DataFrame.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Years in table order.
    pub fn years(&self) -> Vec<i64> {
        self.df
            .column(TAHUN)
            .ok()
            .and_then(|col| col.i64().ok().map(|ca| ca.into_iter().flatten().collect()))
            .unwrap_or_default()
    }

    /// Column values in table order, nulls kept as `None`.
    pub fn values(&self, name: &str) -> Result<Vec<Option<f64>>, PolarsError> {
        let column = self.df.column(name)?.cast(&DataType::Float64)?;
        let values = column
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(values)
    }

    /// `(Tahun, value)` pairs for a column, skipping missing values.
    pub fn year_series(&self, name: &str) -> Result<Vec<(i64, f64)>, PolarsError> {
        let values = self.values(name)?;
        Ok(self
            .years()
            .into_iter()
            .zip(values)
            .filter_map(|(year, v)| v.map(|v| (year, v)))
            .collect())
    }

    /// Names of numeric columns in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|col| is_numeric(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Copy of this table with `column` added (or replaced).
    pub fn with_column(&self, column: Column) -> Result<Self, PolarsError> {
        let mut df = self.df.clone();
        df.with_column(column)?;
        Ok(Self { df })
    }
}

/// Plain-text snapshot of a DataFrame for table views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn from_dataframe(df: &DataFrame) -> Self {
        let headers = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = (0..df.height())
            .map(|i| {
                df.get_columns()
                    .iter()
                    .map(|col| col.get(i).map(Self::format_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    fn format_cell(value: AnyValue) -> String {
        match value {
            AnyValue::Null => String::new(),
            AnyValue::Float64(v) if v.is_nan() => String::new(),
            AnyValue::Float64(v) => format!("{:.2}", v),
            AnyValue::Float32(v) => format!("{:.2}", v),
            other => other.to_string().trim_matches('"').to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClimateTable, TableData};
    use crate::data::{LoaderError, SUHU};
    use polars::prelude::*;

    fn frame(years: &[i64], suhu: &[Option<f64>]) -> DataFrame {
        let n = years.len();
        df!(
            "Tahun" => years,
            "Suhu" => suhu,
            "Suhu_Max" => vec![32.0; n],
            "Suhu_Min" => vec![22.0; n],
            "Curah_Hujan" => vec![2500.0; n],
            "kelembaban" => vec![84.0; n],
        )
        .unwrap()
    }

    #[test]
    fn test_unsorted_years_are_sorted() {
        let df = frame(&[2001, 1999, 2000], &[Some(27.1), Some(26.9), Some(27.0)]);
        let table = ClimateTable::from_dataframe(df).unwrap();
        assert_eq!(table.years(), vec![1999, 2000, 2001]);
        assert_eq!(
            table.values(SUHU).unwrap(),
            vec![Some(26.9), Some(27.0), Some(27.1)]
        );
    }

    #[test]
    fn test_duplicate_year_rejected() {
        let df = frame(&[1999, 2000, 1999], &[Some(26.9), Some(27.0), Some(27.1)]);
        let result = ClimateTable::from_dataframe(df);
        assert!(matches!(result, Err(LoaderError::DuplicateYear(1999))));
    }

    #[test]
    fn test_missing_required_column() {
        let df = frame(&[1999], &[Some(26.9)]).drop("Suhu_Min").unwrap();
        let result = ClimateTable::from_dataframe(df);
        assert!(matches!(result, Err(LoaderError::MissingColumn(ref c)) if c == "Suhu_Min"));
    }

    #[test]
    fn test_non_numeric_measurement_rejected() {
        let mut df = frame(&[1999], &[Some(26.9)]);
        df.with_column(Column::new("kelembaban".into(), ["tinggi"]))
            .unwrap();
        let result = ClimateTable::from_dataframe(df);
        assert!(matches!(result, Err(LoaderError::NonNumericColumn(ref c)) if c == "kelembaban"));
    }

    #[test]
    fn test_year_series_skips_missing_values() {
        let df = frame(&[1999, 2000, 2001], &[Some(26.9), None, Some(27.1)]);
        let table = ClimateTable::from_dataframe(df).unwrap();
        assert_eq!(
            table.year_series(SUHU).unwrap(),
            vec![(1999, 26.9), (2001, 27.1)]
        );
    }

    #[test]
    fn test_optional_columns_detected() {
        let mut df = frame(&[1999], &[Some(26.9)]);
        df.with_column(Column::new("matahari".into(), [5.5])).unwrap();
        let table = ClimateTable::from_dataframe(df).unwrap();
        assert!(table.has_column("matahari"));
        assert!(!table.has_column("kecepatan_angin"));
        assert!(table.numeric_columns().contains(&"matahari".to_string()));
    }

    #[test]
    fn test_table_data_formats_floats() {
        let df = frame(&[1999], &[Some(26.912)]);
        let table = ClimateTable::from_dataframe(df).unwrap();
        let data = TableData::from_dataframe(table.dataframe());
        assert_eq!(data.headers[0], "Tahun");
        assert_eq!(data.rows[0][0], "1999");
        assert_eq!(data.rows[0][1], "26.91");
    }
}
