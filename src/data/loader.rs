//! Spreadsheet Loader Module
//! Reads the annual climate sheet into a Polars DataFrame and renames the source columns.

use crate::data::{ClimateTable, COLUMN_RENAMES};
use calamine::{open_workbook_auto, Data, Reader};
use log::{debug, info};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("Failed to read spreadsheet: {0}")]
    SpreadsheetError(#[from] calamine::Error),
    #[error("Workbook contains no worksheet")]
    NoWorksheet,
    #[error("Failed to load table: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Column {0} is not numeric")]
    NonNumericColumn(String),
    #[error("Table has no records")]
    EmptyTable,
    #[error("Record {row} has no year")]
    MissingYear { row: usize },
    #[error("Year {0} appears more than once")]
    DuplicateYear(i64),
}

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Loads the climate sheet from disk. The file is opened once per call and
/// closed before returning.
pub struct DataLoader;

impl DataLoader {
    /// Load, rename and validate the table at `path`.
    pub fn load(path: &Path) -> Result<ClimateTable, LoaderError> {
        let df = Self::read_file(path)?;
        debug!(
            "Read {} rows, {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );

        let df = Self::rename_columns(df)?;
        let table = ClimateTable::from_dataframe(df)?;
        info!("Loaded {} annual records from {}", table.height(), path.display());
        Ok(table)
    }

    /// Read the raw sheet, dispatching on the file extension.
    pub fn read_file(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if extension == "csv" {
            Self::read_csv(path)
        } else if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
            Self::read_workbook(path)
        } else {
            Err(LoaderError::UnsupportedFormat(path.to_path_buf()))
        }
    }

    fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// First worksheet, first row as header.
    fn read_workbook(path: &Path) -> Result<DataFrame, LoaderError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LoaderError::NoWorksheet)??;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Err(LoaderError::EmptyTable);
        };

        let names: Vec<String> = header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Data::Empty => format!("column_{}", i),
                other => other.to_string().trim().to_string(),
            })
            .collect();

        // Trailing blank rows are common in hand-edited sheets
        let body: Vec<&[Data]> = rows
            .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
            .collect();

        let columns: Vec<Column> = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<&Data> = body
                    .iter()
                    .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                    .collect();
                Self::workbook_column(name, &cells)
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    /// A column whose non-empty cells are all numbers becomes Float64,
    /// anything else is kept as text. Error cells (`#N/A`, `#DIV/0!`) are
    /// read as missing values.
    fn workbook_column(name: &str, cells: &[&Data]) -> Column {
        let numeric = cells.iter().all(|cell| {
            matches!(
                cell,
                Data::Int(_) | Data::Float(_) | Data::Empty | Data::Error(_)
            )
        });

        if numeric {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Int(v) => Some(*v as f64),
                    Data::Float(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        } else {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|cell| match cell {
                    Data::Empty | Data::Error(_) => None,
                    other => Some(other.to_string()),
                })
                .collect();
            Column::new(name.into(), values)
        }
    }

    /// Rename the sheet's source columns to their canonical names.
    ///
    /// Every source column must be present; nothing is renamed otherwise.
    /// A table that was already renamed therefore fails here.
    pub fn rename_columns(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        for (source, _) in COLUMN_RENAMES {
            if df.column(source).is_err() {
                return Err(LoaderError::MissingColumn(source.to_string()));
            }
        }

        for (source, target) in COLUMN_RENAMES {
            df.rename(source, target.into())?;
        }
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::{DataLoader, LoaderError};
    use crate::charts::{ViewBuilder, ViewKind};
    use crate::data::{CURAH_HUJAN, KELEMBABAN, MATAHARI, SUHU, SUHU_MAX, SUHU_MIN, TAHUN};
    use crate::stats::StatsError;
    use calamine::{CellErrorType, Data};
    use polars::prelude::*;
    use rust_xlsxwriter::{Workbook, Worksheet};
    use std::io::Write;
    use std::path::Path;

    const HEADER: [&str; 6] = ["Tahun", "Tavg", "curah_hujan", "Tx", "Tn", "kelembaban"];

    const SHEET: &str = "\
Tahun,Tavg,curah_hujan,Tx,Tn,kelembaban
1992,27.0,2600.5,32.5,22.0,84.0
1990,26.0,2400.0,31.0,21.5,85.0
1991,28.0,2100.0,33.0,23.0,83.0
";

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn write_xlsx(fill: impl FnOnce(&mut Worksheet)) -> tempfile::NamedTempFile {
        let file = tempfile::Builder::new()
            .suffix(".xlsx")
            .tempfile()
            .unwrap();
        let mut workbook = Workbook::new();
        fill(workbook.add_worksheet());
        workbook.save(file.path()).unwrap();
        file
    }

    fn write_record(sheet: &mut Worksheet, row: u32, values: &[f64]) {
        for (col, value) in values.iter().enumerate() {
            sheet.write_number(row, col as u16, *value).unwrap();
        }
    }

    fn source_frame() -> DataFrame {
        df!(
            "Tahun" => [1990i64, 1991],
            "Tavg" => [26.0, 28.0],
            "curah_hujan" => [2400.0, 2100.0],
            "Tx" => [31.0, 33.0],
            "Tn" => [21.5, 23.0],
            "kelembaban" => [85.0, 83.0],
        )
        .unwrap()
    }

    #[test]
    fn test_rename_columns() {
        let df = DataLoader::rename_columns(source_frame()).unwrap();
        for name in [SUHU, CURAH_HUJAN, SUHU_MAX, SUHU_MIN, TAHUN] {
            assert!(df.column(name).is_ok(), "missing {name}");
        }
        assert!(df.column("Tavg").is_err());
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_rename_twice_fails() {
        let df = DataLoader::rename_columns(source_frame()).unwrap();
        let again = DataLoader::rename_columns(df.clone());
        assert!(matches!(again, Err(LoaderError::MissingColumn(ref c)) if c == "Tavg"));
        // The renamed frame still holds all of its data
        assert_eq!(df.width(), 6);
    }

    #[test]
    fn test_rename_missing_source_column() {
        let df = source_frame().drop("Tn").unwrap();
        let result = DataLoader::rename_columns(df);
        assert!(matches!(result, Err(LoaderError::MissingColumn(ref c)) if c == "Tn"));
    }

    #[test]
    fn test_load_csv_sorts_by_year() {
        let file = write_csv(SHEET);
        let table = DataLoader::load(file.path()).unwrap();
        assert_eq!(table.height(), 3);
        assert_eq!(table.years(), vec![1990, 1991, 1992]);
        let suhu: Vec<Option<f64>> = table.values(SUHU).unwrap();
        assert_eq!(suhu, vec![Some(26.0), Some(28.0), Some(27.0)]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = DataLoader::load(Path::new("/nonexistent/Data_Tahunan.xlsx"));
        assert!(matches!(result, Err(LoaderError::FileNotFound(_))));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let result = DataLoader::load(file.path());
        assert!(matches!(result, Err(LoaderError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_missing_humidity_column() {
        let file = write_csv("Tahun,Tavg,curah_hujan,Tx,Tn\n1990,26.0,2400.0,31.0,21.5\n");
        let result = DataLoader::load(file.path());
        assert!(matches!(result, Err(LoaderError::MissingColumn(ref c)) if c == "kelembaban"));
    }

    #[test]
    fn test_load_header_only_is_empty() {
        let file = write_csv("Tahun,Tavg,curah_hujan,Tx,Tn,kelembaban\n");
        let result = DataLoader::load(file.path());
        assert!(matches!(result, Err(LoaderError::EmptyTable)));
    }

    #[test]
    fn test_load_duplicate_year() {
        let file = write_csv(
            "Tahun,Tavg,curah_hujan,Tx,Tn,kelembaban\n\
             1990,26.0,2400.0,31.0,21.5,85.0\n\
             1990,26.5,2300.0,31.5,21.0,84.0\n",
        );
        let result = DataLoader::load(file.path());
        assert!(matches!(result, Err(LoaderError::DuplicateYear(1990))));
    }

    #[test]
    fn test_load_csv_empty_optional_column() {
        let file = write_csv(
            "Tahun,Tavg,curah_hujan,Tx,Tn,kelembaban,matahari\n\
             1990,26.0,2400.0,31.0,21.5,85.0,\n\
             1991,28.0,2100.0,33.0,23.0,83.0,\n",
        );
        let table = DataLoader::load(file.path()).unwrap();
        assert!(table.has_column(MATAHARI));
        assert_eq!(table.values(MATAHARI).unwrap(), vec![None, None]);

        // Only the sunshine view is affected
        let view = ViewBuilder::default().build(ViewKind::Sunshine, &table);
        assert!(matches!(view.content, Err(StatsError::NoValues(ref c)) if c == MATAHARI));
        let view = ViewBuilder::default().build(ViewKind::Temperature, &table);
        assert!(view.content.is_ok());
    }

    #[test]
    fn test_workbook_error_cells_are_missing() {
        let na = Data::Error(CellErrorType::NA);
        let div = Data::Error(CellErrorType::Div0);
        let value = Data::Float(5.2);
        let column = DataLoader::workbook_column(MATAHARI, &[&value, &na, &div]);
        assert_eq!(column.dtype(), &DataType::Float64);
        let values: Vec<Option<f64>> = column.f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(5.2), None, None]);
    }

    #[test]
    fn test_load_xlsx_renames_and_sorts() {
        let file = write_xlsx(|sheet| {
            for (col, name) in HEADER.iter().enumerate() {
                sheet.write_string(0, col as u16, *name).unwrap();
            }
            // Column 6 has no header; column 7 is sunshine
            sheet.write_string(0, 7, "matahari").unwrap();
            write_record(sheet, 1, &[1992.0, 27.0, 2600.5, 32.5, 22.0, 84.0]);
            sheet.write_number(1, 7, 5.4).unwrap();
            write_record(sheet, 2, &[1990.0, 26.0, 2400.0, 31.0, 21.5, 85.0]);
            // Row 3 left blank
            write_record(sheet, 4, &[1991.0, 28.0, 2100.0, 33.0, 23.0, 83.0]);
            sheet.write_number(4, 7, 5.1).unwrap();
        });

        let table = DataLoader::load(file.path()).unwrap();
        assert_eq!(table.height(), 3);
        assert_eq!(table.years(), vec![1990, 1991, 1992]);
        assert_eq!(
            table.values(SUHU).unwrap(),
            vec![Some(26.0), Some(28.0), Some(27.0)]
        );
        assert_eq!(
            table.values(CURAH_HUJAN).unwrap(),
            vec![Some(2400.0), Some(2100.0), Some(2600.5)]
        );
        assert_eq!(
            table.values(MATAHARI).unwrap(),
            vec![None, Some(5.1), Some(5.4)]
        );
        assert!(table.has_column("column_6"));
        assert!(!table.has_column("Tavg"));
        assert_eq!(
            table.dataframe().column(TAHUN).unwrap().dtype(),
            &DataType::Int64
        );
    }

    #[test]
    fn test_load_xlsx_text_humidity_rejected() {
        let file = write_xlsx(|sheet| {
            for (col, name) in HEADER.iter().enumerate() {
                sheet.write_string(0, col as u16, *name).unwrap();
            }
            write_record(sheet, 1, &[1990.0, 26.0, 2400.0, 31.0, 21.5, 85.0]);
            write_record(sheet, 2, &[1991.0, 28.0, 2100.0, 33.0, 23.0]);
            sheet.write_string(2, 5, "lembab").unwrap();
        });

        let result = DataLoader::load(file.path());
        assert!(matches!(result, Err(LoaderError::NonNumericColumn(ref c)) if c == KELEMBABAN));
    }

    #[test]
    fn test_load_xlsx_header_only_is_empty() {
        let file = write_xlsx(|sheet| {
            for (col, name) in HEADER.iter().enumerate() {
                sheet.write_string(0, col as u16, *name).unwrap();
            }
        });
        let result = DataLoader::load(file.path());
        assert!(matches!(result, Err(LoaderError::EmptyTable)));
    }
}
