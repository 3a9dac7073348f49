//! GUI module - User interface components

mod app;
mod control_panel;
mod view_panel;

pub use app::ClimateDashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction, Status};
pub use view_panel::ViewPanel;
