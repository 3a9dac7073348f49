//! Correlation Module
//! Pearson correlation matrix and least-squares trend line.

use crate::data::ClimateTable;
use crate::stats::StatsError;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Symmetric Pearson correlation matrix over the numeric columns of a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlate every pair of numeric columns, in table order.
    ///
    /// The diagonal is 1.0. A pair with fewer than two complete observations
    /// or a constant side is NaN.
    pub fn from_table(table: &ClimateTable) -> Result<Self, StatsError> {
        if table.height() == 0 {
            return Err(StatsError::EmptyTable);
        }

        let columns = table.numeric_columns();
        let data: Vec<Vec<Option<f64>>> = columns
            .iter()
            .map(|name| table.values(name))
            .collect::<Result<_, _>>()?;

        let n = columns.len();
        let mut values = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            values[i][i] = 1.0;
            for j in (i + 1)..n {
                let r = Self::pearson(&data[i], &data[j]);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Ok(Self { columns, values })
    }

    /// Pearson r over the pairwise-complete observations of `x` and `y`.
    pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
        let (xs, ys) = complete_pairs(x, y);
        if xs.len() < 2 {
            return f64::NAN;
        }

        let sx = xs.iter().std_dev();
        let sy = ys.iter().std_dev();
        if sx == 0.0 || sy == 0.0 {
            return f64::NAN;
        }

        let r = xs.iter().covariance(ys.iter()) / (sx * sy);
        r.clamp(-1.0, 1.0)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(f64::NAN)
    }
}

fn complete_pairs(x: &[Option<f64>], y: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    x.iter()
        .zip(y.iter())
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => Some((*a, *b)),
            _ => None,
        })
        .unzip()
}

/// Ordinary least-squares line `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub points: usize,
}

impl LinearFit {
    pub fn from_pairs(x: &[Option<f64>], y: &[Option<f64>]) -> Result<Self, StatsError> {
        let (xs, ys) = complete_pairs(x, y);
        if xs.len() < 2 {
            return Err(StatsError::DegenerateFit("fewer than two points"));
        }

        let var_x = xs.iter().variance();
        if var_x == 0.0 {
            return Err(StatsError::DegenerateFit("all x values are equal"));
        }

        let slope = xs.iter().covariance(ys.iter()) / var_x;
        let intercept = ys.iter().mean() - slope * xs.iter().mean();

        Ok(Self {
            slope,
            intercept,
            points: xs.len(),
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}
