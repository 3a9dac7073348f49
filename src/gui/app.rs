//! Climate Dashboard Main Application
//! Main window with control panel and view panel.

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use crate::data::LoaderError;
use crate::export::export_dashboard;
use crate::gui::{ControlPanel, ControlPanelAction, Status, ViewPanel};
use egui::SidePanel;
use log::{error, info};

/// Main application window.
pub struct ClimateDashboardApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    dashboard: Result<Dashboard, LoaderError>,
}

impl ClimateDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let control_panel = ControlPanel::new(&config);
        let dashboard = Dashboard::load(&config);
        let mut app = Self {
            config,
            control_panel,
            dashboard,
        };
        app.update_status();
        app
    }

    /// Rerun the whole pipeline from disk.
    fn reload(&mut self) {
        self.control_panel.apply_to(&mut self.config);
        info!("Loading {}", self.config.input.display());
        self.dashboard = Dashboard::load(&self.config);
        self.update_status();
    }

    fn update_status(&mut self) {
        let status = match &self.dashboard {
            Ok(dashboard) => Status::Loaded {
                records: dashboard.records(),
                views: dashboard.views.len(),
                unavailable: dashboard.views.iter().filter(|v| v.is_error()).count(),
            },
            Err(e) => {
                error!("{}", e);
                Status::Error(e.to_string())
            }
        };
        self.control_panel.set_status(status);
    }

    fn handle_open_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Spreadsheets", &["xlsx", "xlsm", "xlsb", "xls", "ods", "csv"])
            .pick_file()
        {
            self.config.input = path;
            self.reload();
        }
    }

    fn handle_export(&mut self) {
        let Ok(dashboard) = &self.dashboard else {
            return;
        };
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        let status = match export_dashboard(dashboard, &self.config, &dir) {
            Ok(report) => Status::Exported(format!(
                "{} ({} charts)",
                dir.display(),
                report.charts.len()
            )),
            Err(e) => {
                error!("Export failed: {}", e);
                Status::Error(e.to_string())
            }
        };
        self.control_panel.set_status(status);
    }
}

impl eframe::App for ClimateDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action =
                        self.control_panel
                            .show(ui, &self.config.title, &self.config.input);

                    match action {
                        ControlPanelAction::OpenFile => self.handle_open_file(),
                        ControlPanelAction::Reload => self.reload(),
                        ControlPanelAction::Export => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard views
        egui::CentralPanel::default().show(ctx, |ui| {
            let views = self.dashboard.as_ref().map(|d| d.views.as_slice());
            ViewPanel::show(ui, views);
        });
    }
}
