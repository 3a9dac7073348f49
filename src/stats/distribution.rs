//! Distribution Module
//! Equal-width histogram with a Gaussian kernel density overlay.

use crate::stats::StatsError;
use serde::Serialize;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;

/// Number of points sampled along the density curve.
pub const DENSITY_SAMPLES: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `bins + 1` ascending edges; the last bin is closed on the right.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// When every value is equal the range widens to `[v - 0.5, v + 0.5]`.
    pub fn from_values(values: &[f64], bins: usize, column: &str) -> Result<Self, StatsError> {
        let bins = bins.max(1);
        let (min, max) = values
            .iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, &v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            })
            .ok_or_else(|| StatsError::NoValues(column.to_string()))?;

        let (lo, hi) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();

        let mut counts = vec![0usize; bins];
        for &v in values.iter().filter(|v| v.is_finite()) {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if self.bins() > 0 => (hi - lo) / self.bins() as f64,
            _ => 0.0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(left, right, count)` for each bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }

    /// Gaussian KDE over `values` (Scott's bandwidth), scaled to bin counts
    /// so it overlays the bars. `None` for fewer than two values or no spread.
    pub fn density_curve(&self, values: &[f64]) -> Option<Vec<[f64; 2]>> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let n = finite.len();
        if n < 2 {
            return None;
        }

        let sigma = finite.iter().std_dev();
        if sigma.is_nan() || sigma <= 0.0 {
            return None;
        }
        let bandwidth = sigma * (n as f64).powf(-0.2);
        let kernel = Normal::new(0.0, 1.0).ok()?;

        let lo = *self.edges.first()?;
        let hi = *self.edges.last()?;
        let scale = n as f64 * self.bin_width();
        let step = (hi - lo) / (DENSITY_SAMPLES - 1) as f64;

        let curve = (0..DENSITY_SAMPLES)
            .map(|i| {
                let x = lo + i as f64 * step;
                let density = finite
                    .iter()
                    .map(|xi| kernel.pdf((x - xi) / bandwidth))
                    .sum::<f64>()
                    / (n as f64 * bandwidth);
                [x, density * scale]
            })
            .collect();

        Some(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::{Histogram, DENSITY_SAMPLES};
    use crate::stats::StatsError;

    #[test]
    fn test_histogram_counts_every_value() {
        let values = [80.0, 81.5, 82.0, 83.2, 84.0, 84.1, 85.9, 86.0, 88.0, 90.0];
        let hist = Histogram::from_values(&values, 20, "kelembaban").unwrap();
        assert_eq!(hist.bins(), 20);
        assert_eq!(hist.edges.len(), 21);
        assert_eq!(hist.total(), values.len());
        assert_eq!(hist.edges[0], 80.0);
        assert!((hist.edges[20] - 90.0).abs() < 1e-9);
        // Maximum lands in the last (closed) bin
        assert_eq!(hist.counts[19], 1);
        assert_eq!(hist.counts[0], 1);
    }

    #[test]
    fn test_histogram_constant_values() {
        let hist = Histogram::from_values(&[84.0, 84.0, 84.0], 20, "kelembaban").unwrap();
        assert_eq!(hist.edges[0], 83.5);
        assert!((hist.edges.last().unwrap() - 84.5).abs() < 1e-9);
        assert_eq!(hist.total(), 3);
        assert!(hist.density_curve(&[84.0, 84.0, 84.0]).is_none());
    }

    #[test]
    fn test_histogram_without_values() {
        let result = Histogram::from_values(&[], 20, "kelembaban");
        assert!(matches!(result, Err(StatsError::NoValues(ref c)) if c == "kelembaban"));
    }

    #[test]
    fn test_density_curve_spans_histogram() {
        let values = [80.0, 82.0, 83.0, 84.0, 84.5, 85.0, 86.0, 88.0];
        let hist = Histogram::from_values(&values, 20, "kelembaban").unwrap();
        let curve = hist.density_curve(&values).unwrap();
        assert_eq!(curve.len(), DENSITY_SAMPLES);
        assert_eq!(curve[0][0], 80.0);
        assert!((curve[DENSITY_SAMPLES - 1][0] - 88.0).abs() < 1e-9);
        assert!(curve.iter().all(|p| p[1] >= 0.0));
    }
}
