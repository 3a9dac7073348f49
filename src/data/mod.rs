//! Data module - spreadsheet loading and table preparation

mod loader;
mod processor;
mod table;

pub use loader::{DataLoader, LoaderError};
pub use processor::DataProcessor;
pub use table::{ClimateTable, TableData};

/// Canonical column names used throughout the dashboard.
pub const TAHUN: &str = "Tahun";
pub const SUHU: &str = "Suhu";
pub const SUHU_MAX: &str = "Suhu_Max";
pub const SUHU_MIN: &str = "Suhu_Min";
pub const CURAH_HUJAN: &str = "Curah_Hujan";
pub const KELEMBABAN: &str = "kelembaban";
pub const MATAHARI: &str = "matahari";
pub const KECEPATAN_ANGIN: &str = "kecepatan_angin";

// Derived columns
pub const RENTANG_SUHU: &str = "Rentang_Suhu";
pub const ANOMALI_SUHU: &str = "Anomali_Suhu";
pub const DEKADE: &str = "Dekade";

/// Source sheet column -> canonical column.
pub const COLUMN_RENAMES: [(&str, &str); 4] = [
    ("Tavg", SUHU),
    ("curah_hujan", CURAH_HUJAN),
    ("Tx", SUHU_MAX),
    ("Tn", SUHU_MIN),
];

/// Columns every table must carry after renaming.
pub const REQUIRED_COLUMNS: [&str; 6] = [TAHUN, SUHU, SUHU_MAX, SUHU_MIN, CURAH_HUJAN, KELEMBABAN];

/// Columns that gate their own view when present.
pub const OPTIONAL_COLUMNS: [&str; 2] = [MATAHARI, KECEPATAN_ANGIN];
