//! Chart Plotter Module
//! Draws dashboard views interactively with egui_plot.

use crate::charts::palette::{self, contrast_text, coolwarm, series_color};
use crate::charts::{DashboardView, ViewContent, YearSeries};
use crate::data::TableData;
use crate::stats::{Baseline, CorrelationMatrix, DecadeAverage, ExtremeSummary, Histogram, LinearFit};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, HLine, Legend, Line, Plot, PlotPoints, Points};

const PLOT_HEIGHT: f32 = 280.0;
const NO_NUMERIC_COLUMNS: &str = "Tidak ada kolom numerik untuk dikorelasikan";

fn color32(c: (u8, u8, u8)) -> Color32 {
    Color32::from_rgb(c.0, c.1, c.2)
}

/// Draws one view into the dashboard panel.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a view, or an error card when the view could not be built.
    pub fn draw_view(ui: &mut egui::Ui, view: &DashboardView) {
        let id = view.kind.slug();
        match &view.content {
            Ok(ViewContent::Table(table)) => Self::draw_table(ui, id, table),
            Ok(ViewContent::Line(series)) => Self::draw_year_line(ui, id, series),
            Ok(ViewContent::Bars(series)) => Self::draw_year_bars(ui, id, series),
            Ok(ViewContent::Anomaly { series, baseline }) => {
                Self::draw_anomaly(ui, id, series, baseline)
            }
            Ok(ViewContent::Scatter { points, fit }) => Self::draw_scatter(ui, id, points, fit),
            Ok(ViewContent::Decades(decades)) => Self::draw_decades(ui, id, decades),
            Ok(ViewContent::Extremes(summary)) => Self::draw_extremes(ui, summary),
            Ok(ViewContent::Histogram { histogram, density }) => {
                Self::draw_histogram(ui, id, histogram, density.as_deref())
            }
            Ok(ViewContent::Heatmap(matrix)) => Self::draw_heatmap(ui, id, matrix),
            Err(e) => Self::draw_error(ui, &e.to_string()),
        }
    }

    pub fn draw_error(ui: &mut egui::Ui, message: &str) {
        egui::Frame::none()
            .fill(Color32::from_rgb(253, 237, 236))
            .rounding(6.0)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("⚠ {}", message))
                        .color(Color32::from_rgb(169, 50, 38)),
                );
            });
    }

    fn year_plot(id: &str, series: &YearSeries) -> Plot<'static> {
        Plot::new(format!("plot_{}", id))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Tahun")
            .y_axis_label(format!("{} ({})", series.name, series.unit))
    }

    fn draw_year_line(ui: &mut egui::Ui, id: &str, series: &YearSeries) {
        let color = color32(series_color(&series.name));
        Self::year_plot(id, series).show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.points.clone()))
                    .color(color)
                    .width(2.0)
                    .name(&series.name),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(series.points.clone()))
                    .radius(3.0)
                    .color(color),
            );
        });
    }

    fn draw_year_bars(ui: &mut egui::Ui, id: &str, series: &YearSeries) {
        let color = color32(series_color(&series.name));
        let bars = series
            .points
            .iter()
            .map(|p| Bar::new(p[0], p[1]).width(0.8).fill(color))
            .collect();
        Self::year_plot(id, series).show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(&series.name));
        });
    }

    /// Bars coloured by sign around a zero reference line.
    fn draw_anomaly(ui: &mut egui::Ui, id: &str, series: &YearSeries, baseline: &Baseline) {
        ui.label(format!(
            "Baseline {}-{}: {:.2} °C ({} tahun)",
            baseline.window.start, baseline.window.end, baseline.mean, baseline.records
        ));
        let bars = series
            .points
            .iter()
            .map(|p| {
                let color = if p[1] >= 0.0 {
                    palette::WARM
                } else {
                    palette::COOL
                };
                Bar::new(p[0], p[1]).width(0.8).fill(color32(color))
            })
            .collect();
        Self::year_plot(id, series).show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(&series.name));
            plot_ui.hline(HLine::new(0.0).color(Color32::BLACK).width(1.0));
        });
    }

    fn draw_scatter(ui: &mut egui::Ui, id: &str, points: &[[f64; 2]], fit: &LinearFit) {
        let (xmin, xmax) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, p| {
            (acc.0.min(p[0]), acc.1.max(p[0]))
        });
        ui.label(format!(
            "Tren: Curah_Hujan = {:.1} × Suhu {:+.1}",
            fit.slope, fit.intercept
        ));
        Plot::new(format!("plot_{}", id))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label("Suhu (°C)")
            .y_axis_label("Curah_Hujan (mm)")
            .show(ui, |plot_ui| {
                plot_ui.points(
                    Points::new(PlotPoints::from(points.to_vec()))
                        .radius(4.0)
                        .color(color32(palette::RAINFALL))
                        .name("Tahun"),
                );
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![
                        [xmin, fit.predict(xmin)],
                        [xmax, fit.predict(xmax)],
                    ]))
                    .color(color32(palette::TREND))
                    .width(2.0)
                    .name("Tren linear"),
                );
            });
    }

    fn draw_decades(ui: &mut egui::Ui, id: &str, decades: &[DecadeAverage]) {
        let labels: Vec<i64> = decades.iter().map(|d| d.decade).collect();
        let grouped = |pick: fn(&DecadeAverage) -> Option<f64>, offset: f64, color: (u8, u8, u8)| {
            decades
                .iter()
                .enumerate()
                .filter_map(|(i, d)| {
                    pick(d).map(|v| Bar::new(i as f64 + offset, v).width(0.35).fill(color32(color)))
                })
                .collect::<Vec<_>>()
        };
        let suhu = grouped(|d| d.suhu, -0.18, palette::TEMPERATURE);
        let rain = grouped(|d| d.curah_hujan, 0.18, palette::RAINFALL);

        Plot::new(format!("plot_{}", id))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label("Dekade")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                    labels
                        .get(idx as usize)
                        .map(|d| d.to_string())
                        .unwrap_or_default()
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(suhu).name("Suhu"));
                plot_ui.bar_chart(BarChart::new(rain).name("Curah_Hujan"));
            });

        egui::Grid::new(format!("grid_{}", id))
            .striped(true)
            .spacing([24.0, 4.0])
            .show(ui, |ui| {
                for header in ["Dekade", "Suhu", "Curah_Hujan", "Tahun"] {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();
                for d in decades {
                    ui.label(d.decade.to_string());
                    ui.label(d.suhu.map(|v| format!("{:.2}", v)).unwrap_or_default());
                    ui.label(d.curah_hujan.map(|v| format!("{:.2}", v)).unwrap_or_default());
                    ui.label(d.years.to_string());
                    ui.end_row();
                }
            });
    }

    fn draw_extremes(ui: &mut egui::Ui, summary: &ExtremeSummary) {
        for entry in summary.entries() {
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("{}:", entry.label)).strong());
                ui.label(format!("{} ({})", entry.extreme.year, entry.formatted_value()));
            });
        }
    }

    fn draw_histogram(
        ui: &mut egui::Ui,
        id: &str,
        histogram: &Histogram,
        density: Option<&[[f64; 2]]>,
    ) {
        let width = histogram.bin_width();
        ui.label(format!("{} bin, n = {}", histogram.bins(), histogram.total()));
        let bars = histogram
            .bars()
            .map(|(left, right, count)| {
                Bar::new((left + right) / 2.0, count as f64)
                    .width(width)
                    .fill(color32(palette::HISTOGRAM))
                    .stroke(egui::Stroke::new(1.0, Color32::BLACK))
            })
            .collect();

        Plot::new(format!("plot_{}", id))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Kelembaban (%)")
            .y_axis_label("Jumlah tahun")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Frekuensi"));
                if let Some(curve) = density {
                    plot_ui.line(
                        Line::new(PlotPoints::from(curve.to_vec()))
                            .color(color32(palette::RAINFALL))
                            .width(2.0)
                            .name("KDE"),
                    );
                }
            });
    }

    /// Annotated matrix of coloured cells.
    fn draw_heatmap(ui: &mut egui::Ui, id: &str, matrix: &CorrelationMatrix) {
        if matrix.is_empty() {
            Self::draw_error(ui, NO_NUMERIC_COLUMNS);
            return;
        }
        egui::ScrollArea::horizontal()
            .id_salt(format!("scroll_{}", id))
            .show(ui, |ui| {
                egui::Grid::new(format!("grid_{}", id))
                    .spacing([2.0, 2.0])
                    .show(ui, |ui| {
                        ui.label("");
                        for name in &matrix.columns {
                            ui.label(RichText::new(name).small().strong());
                        }
                        ui.end_row();

                        for (i, name) in matrix.columns.iter().enumerate() {
                            ui.label(RichText::new(name).small().strong());
                            for j in 0..matrix.len() {
                                let value = matrix.get(i, j);
                                let text = if value.is_nan() {
                                    String::new()
                                } else {
                                    format!("{:.2}", value)
                                };
                                egui::Frame::none()
                                    .fill(color32(coolwarm(value)))
                                    .inner_margin(egui::Margin::symmetric(8.0, 4.0))
                                    .show(ui, |ui| {
                                        ui.label(
                                            RichText::new(text)
                                                .monospace()
                                                .color(color32(contrast_text(value))),
                                        );
                                    });
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn draw_table(ui: &mut egui::Ui, id: &str, table: &TableData) {
        egui::ScrollArea::both()
            .id_salt(format!("scroll_{}", id))
            .max_height(PLOT_HEIGHT)
            .show(ui, |ui| {
                egui::Grid::new(format!("grid_{}", id))
                    .striped(true)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        for header in &table.headers {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();
                        for row in &table.rows {
                            for cell in row {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
