//! View Panel Widget
//! Central scrollable column of dashboard view cards.

use crate::charts::{ChartPlotter, DashboardView};
use crate::data::LoaderError;
use egui::{Color32, RichText, ScrollArea};

const CARD_SPACING: f32 = 15.0;

pub struct ViewPanel;

impl ViewPanel {
    /// Draw every view, or the load error when the session failed.
    pub fn show(ui: &mut egui::Ui, views: Result<&[DashboardView], &LoaderError>) {
        let views = match views {
            Ok(views) => views,
            Err(e) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(RichText::new("Data could not be loaded").size(20.0).strong());
                    ui.add_space(10.0);
                    ChartPlotter::draw_error(ui, &e.to_string());
                });
                return;
            }
        };

        if views.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        }

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for view in views {
                    Self::draw_card(ui, view);
                    ui.add_space(CARD_SPACING);
                }
            });
    }

    fn draw_card(ui: &mut egui::Ui, view: &DashboardView) {
        let border_color = if view.is_error() {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::from_rgb(100, 149, 237)
        };

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, border_color))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(view.title()).size(18.0).strong());
                ui.add_space(8.0);
                ChartPlotter::draw_view(ui, view);
            });
    }
}
