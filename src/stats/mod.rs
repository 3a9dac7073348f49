//! Stats module - derived climate metrics

mod calculator;
mod correlation;
mod distribution;

pub use calculator::{
    Baseline, BaselineWindow, DecadeAverage, Extreme, ExtremeEntry, ExtremeSummary,
    StatsCalculator, StatsError,
};
pub use correlation::{CorrelationMatrix, LinearFit};
pub use distribution::Histogram;
