//! Control Panel Widget
//! Left side panel with data source, baseline settings and actions.

use crate::config::DashboardConfig;
use egui::{Color32, RichText};
use std::path::Path;

/// Outcome of the last pipeline run, shown under the buttons.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Ready,
    Loaded { records: usize, views: usize, unavailable: usize },
    Exported(String),
    Error(String),
}

impl Status {
    fn text(&self) -> String {
        match self {
            Status::Ready => "Ready".to_string(),
            Status::Loaded {
                records,
                views,
                unavailable: 0,
            } => format!("{} records, {} views", records, views),
            Status::Loaded {
                records,
                views,
                unavailable,
            } => format!(
                "{} records, {} views ({} unavailable)",
                records, views, unavailable
            ),
            Status::Exported(dir) => format!("Exported to {}", dir),
            Status::Error(message) => format!("Error: {}", message),
        }
    }

    fn color(&self) -> Color32 {
        match self {
            Status::Error(_) => Color32::from_rgb(220, 53, 69),
            Status::Loaded { unavailable, .. } if *unavailable > 0 => {
                Color32::from_rgb(243, 156, 18)
            }
            Status::Loaded { .. } | Status::Exported(_) => Color32::from_rgb(40, 167, 69),
            Status::Ready => Color32::GRAY,
        }
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub baseline_start: i64,
    pub baseline_end: i64,
    pub histogram_bins: usize,
    pub status: Status,
}

impl ControlPanel {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            baseline_start: config.baseline_start,
            baseline_end: config.baseline_end,
            histogram_bins: config.histogram_bins,
            status: Status::Ready,
        }
    }

    /// Copy the edited settings back into `config`.
    pub fn apply_to(&self, config: &mut DashboardConfig) {
        config.baseline_start = self.baseline_start;
        config.baseline_end = self.baseline_end;
        config.histogram_bins = self.histogram_bins;
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui, title: &str, source: &Path) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new(format!("🌦 {}", title))
                    .size(18.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let name = source
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| source.display().to_string());
                    ui.label(RichText::new(name).size(12.0))
                        .on_hover_text(source.display().to_string());

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Open…").clicked() {
                            action = ControlPanelAction::OpenFile;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Settings Section =====
        ui.label(RichText::new("⚙️ Baseline & Histogram").size(14.0).strong());
        ui.add_space(5.0);

        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                ui.label("Baseline start:");
                ui.add(egui::DragValue::new(&mut self.baseline_start).range(1800..=2100));
                ui.end_row();

                ui.label("Baseline end:");
                ui.add(egui::DragValue::new(&mut self.baseline_end).range(1800..=2100));
                ui.end_row();

                ui.label("Histogram bins:");
                ui.add(egui::DragValue::new(&mut self.histogram_bins).range(1..=100));
                ui.end_row();
            });

        if self.baseline_start > self.baseline_end {
            ui.label(
                RichText::new("Baseline start is after baseline end")
                    .size(11.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Actions Section =====
        ui.vertical_centered(|ui| {
            let valid = self.baseline_start <= self.baseline_end;
            ui.add_enabled_ui(valid, |ui| {
                let button = egui::Button::new(RichText::new("🔄 Reload").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Reload;
                }
            });

            ui.add_space(8.0);

            let export_enabled = matches!(self.status, Status::Loaded { .. } | Status::Exported(_));
            ui.add_enabled_ui(export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("💾 Export…").size(14.0))
                    .min_size(egui::vec2(150.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Export;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);
        ui.label(
            RichText::new(self.status.text())
                .size(11.0)
                .color(self.status.color()),
        );

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenFile,
    Reload,
    Export,
}
