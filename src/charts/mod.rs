//! Charts module - Dashboard views and their rendering

mod palette;
mod plotter;
mod renderer;
mod views;

pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
pub use views::{DashboardView, ViewBuilder, ViewContent, ViewKind, YearSeries};
