//! Static Chart Renderer
//! Draws dashboard views into PNG images with plotters.
//!
//! Layout per view:
//! - Title across the top
//! - Chart (or text block for tables and the extremes summary)
//! - Decade view: grouped bars above, averages table below

use crate::charts::palette::{self, contrast_text, coolwarm, series_color};
use crate::charts::{DashboardView, ViewContent, YearSeries};
use crate::data::TableData;
use crate::stats::{Baseline, CorrelationMatrix, DecadeAverage, ExtremeSummary, Histogram, LinearFit};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::io::Cursor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("View unavailable: {0}")]
    Unavailable(String),
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Summary serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

type Root<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult = Result<(), Box<dyn Error>>;

const TITLE_FONT: (&str, i32) = ("sans-serif", 22);
const LABEL_FONT: (&str, i32) = ("sans-serif", 14);
const CELL_FONT: (&str, i32) = ("sans-serif", 12);

fn rgb(c: (u8, u8, u8)) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one view into PNG bytes.
    pub fn render_view_to_png(
        view: &DashboardView,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let content = view
            .content
            .as_ref()
            .map_err(|e| RenderError::Unavailable(e.to_string()))?;

        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw_content(&root, view.title(), content)
                .map_err(|e| RenderError::Drawing(e.to_string()))?;
        }

        Self::encode_png(buffer, width, height)
    }

    fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| RenderError::Drawing("pixel buffer size mismatch".to_string()))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    fn draw_content(root: &Root, title: &str, content: &ViewContent) -> DrawResult {
        root.fill(&WHITE)?;

        match content {
            ViewContent::Table(table) => Self::draw_table(root, title, table)?,
            ViewContent::Line(series) => Self::draw_year_line(root, title, series)?,
            ViewContent::Bars(series) => Self::draw_year_bars(root, title, series, None)?,
            ViewContent::Anomaly { series, baseline } => {
                Self::draw_year_bars(root, title, series, Some(baseline))?
            }
            ViewContent::Scatter { points, fit } => Self::draw_scatter(root, title, points, fit)?,
            ViewContent::Decades(decades) => Self::draw_decades(root, title, decades)?,
            ViewContent::Extremes(summary) => Self::draw_extremes(root, title, summary)?,
            ViewContent::Histogram { histogram, density } => {
                Self::draw_histogram(root, title, histogram, density.as_deref())?
            }
            ViewContent::Heatmap(matrix) => Self::draw_heatmap(root, title, matrix)?,
        }

        root.present()?;
        Ok(())
    }

    /// Widen `(lo, hi)` by `fraction` of its span on both sides.
    pub fn padded((lo, hi): (f64, f64), fraction: f64) -> (f64, f64) {
        let span = if hi > lo { hi - lo } else { hi.abs().max(1.0) };
        (lo - span * fraction, hi + span * fraction)
    }

    fn draw_year_line(root: &Root, title: &str, series: &YearSeries) -> DrawResult {
        let (x0, x1) = series.year_range().unwrap_or((0.0, 1.0));
        let (y0, y1) = Self::padded(series.value_range().unwrap_or((0.0, 1.0)), 0.1);
        let color = rgb(series_color(&series.name));

        let mut chart = ChartBuilder::on(root)
            .caption(title, TITLE_FONT)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x0 - 0.5..x1 + 0.5, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("Tahun")
            .y_desc(format!("{} ({})", series.name, series.unit))
            .x_label_formatter(&|x| format!("{:.0}", x))
            .draw()?;

        chart.draw_series(LineSeries::new(
            series.points.iter().map(|p| (p[0], p[1])),
            color.stroke_width(2),
        ))?;
        chart.draw_series(
            series
                .points
                .iter()
                .map(|p| Circle::new((p[0], p[1]), 3, color.filled())),
        )?;
        Ok(())
    }

    /// Bars per year. With a baseline, bars are coloured by sign and a zero
    /// reference line is drawn.
    fn draw_year_bars(
        root: &Root,
        title: &str,
        series: &YearSeries,
        baseline: Option<&Baseline>,
    ) -> DrawResult {
        let (x0, x1) = series.year_range().unwrap_or((0.0, 1.0));
        let (lo, hi) = series.value_range().unwrap_or((0.0, 1.0));
        let (y0, y1) = Self::padded((lo.min(0.0), hi.max(0.0)), 0.08);

        let caption = match baseline {
            Some(b) => format!(
                "{} {}-{} ({:.2} °C)",
                title, b.window.start, b.window.end, b.mean
            ),
            None => title.to_string(),
        };

        let mut chart = ChartBuilder::on(root)
            .caption(caption, TITLE_FONT)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x0 - 1.0..x1 + 1.0, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Tahun")
            .y_desc(format!("{} ({})", series.name, series.unit))
            .x_label_formatter(&|x| format!("{:.0}", x))
            .draw()?;

        let base_color = rgb(series_color(&series.name));
        chart.draw_series(series.points.iter().map(|p| {
            let color = match baseline {
                Some(_) if p[1] >= 0.0 => rgb(palette::WARM),
                Some(_) => rgb(palette::COOL),
                None => base_color,
            };
            let (bottom, top) = if p[1] >= 0.0 { (0.0, p[1]) } else { (p[1], 0.0) };
            Rectangle::new([(p[0] - 0.4, bottom), (p[0] + 0.4, top)], color.filled())
        }))?;

        if baseline.is_some() {
            chart.draw_series(LineSeries::new(
                vec![(x0 - 1.0, 0.0), (x1 + 1.0, 0.0)],
                BLACK.stroke_width(1),
            ))?;
        }
        Ok(())
    }

    fn draw_scatter(root: &Root, title: &str, points: &[[f64; 2]], fit: &LinearFit) -> DrawResult {
        let bounds = |axis: usize| {
            points.iter().fold(None, |acc: Option<(f64, f64)>, p| match acc {
                Some((lo, hi)) => Some((lo.min(p[axis]), hi.max(p[axis]))),
                None => Some((p[axis], p[axis])),
            })
        };
        let (xmin, xmax) = bounds(0).unwrap_or((0.0, 1.0));
        let (x0, x1) = Self::padded((xmin, xmax), 0.05);
        let (y0, y1) = Self::padded(bounds(1).unwrap_or((0.0, 1.0)), 0.1);

        let mut chart = ChartBuilder::on(root)
            .caption(title, TITLE_FONT)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc("Suhu (°C)")
            .y_desc("Curah_Hujan (mm)")
            .draw()?;

        chart.draw_series(
            points
                .iter()
                .map(|p| Circle::new((p[0], p[1]), 4, rgb(palette::RAINFALL).filled())),
        )?;
        chart.draw_series(LineSeries::new(
            vec![(xmin, fit.predict(xmin)), (xmax, fit.predict(xmax))],
            rgb(palette::TREND).stroke_width(2),
        ))?;
        Ok(())
    }

    fn draw_decades(root: &Root, title: &str, decades: &[DecadeAverage]) -> DrawResult {
        let (_, height) = root.dim_in_pixel();
        let (upper, lower) = root.split_vertically((height as f64 * 0.62) as u32);

        let n = decades.len().max(1) as f64;
        let top = decades
            .iter()
            .flat_map(|d| [d.suhu, d.curah_hujan])
            .flatten()
            .fold(1.0_f64, f64::max);

        let mut chart = ChartBuilder::on(&upper)
            .caption(title, TITLE_FONT)
            .margin(15)
            .x_label_area_size(35)
            .y_label_area_size(70)
            .build_cartesian_2d(-0.5..n - 0.5, 0.0..top * 1.1)?;

        let labels: Vec<i64> = decades.iter().map(|d| d.decade).collect();
        let formatter = |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() < 1e-6 && idx >= 0.0 {
                labels
                    .get(idx as usize)
                    .map(|d| d.to_string())
                    .unwrap_or_default()
            } else {
                String::new()
            }
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(decades.len() + 1)
            .x_label_formatter(&formatter)
            .y_desc("Rata-rata")
            .draw()?;

        for (offset, color, pick) in [
            (-0.35, palette::TEMPERATURE, 0usize),
            (0.0, palette::RAINFALL, 1usize),
        ] {
            chart
                .draw_series(decades.iter().enumerate().filter_map(|(i, d)| {
                    let value = if pick == 0 { d.suhu } else { d.curah_hujan }?;
                    let x = i as f64 + offset;
                    Some(Rectangle::new(
                        [(x, 0.0), (x + 0.35, value)],
                        rgb(color).filled(),
                    ))
                }))?
                .label(if pick == 0 { "Suhu" } else { "Curah_Hujan" })
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], rgb(color).filled())
                });
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        let table = TableData {
            headers: vec!["Dekade".into(), "Suhu".into(), "Curah_Hujan".into()],
            rows: decades
                .iter()
                .map(|d| {
                    vec![
                        d.decade.to_string(),
                        d.suhu.map(|v| format!("{:.2}", v)).unwrap_or_default(),
                        d.curah_hujan.map(|v| format!("{:.2}", v)).unwrap_or_default(),
                    ]
                })
                .collect(),
        };
        Self::draw_text_grid(&lower, &table, 10)
    }

    fn draw_extremes(root: &Root, title: &str, summary: &ExtremeSummary) -> DrawResult {
        root.draw(&Text::new(title, (20, 15), TITLE_FONT.into_font()))?;
        for (i, entry) in summary.entries().iter().enumerate() {
            root.draw(&Text::new(
                format!("- {}", entry),
                (40, 70 + i as i32 * 36),
                ("sans-serif", 20).into_font(),
            ))?;
        }
        Ok(())
    }

    fn draw_histogram(
        root: &Root,
        title: &str,
        histogram: &Histogram,
        density: Option<&[[f64; 2]]>,
    ) -> DrawResult {
        let x0 = histogram.edges.first().copied().unwrap_or(0.0);
        let x1 = histogram.edges.last().copied().unwrap_or(1.0);
        let peak = histogram.counts.iter().copied().max().unwrap_or(0) as f64;
        let density_peak = density
            .map(|curve| curve.iter().map(|p| p[1]).fold(0.0, f64::max))
            .unwrap_or(0.0);
        let top = peak.max(density_peak).max(1.0) * 1.1;

        let mut chart = ChartBuilder::on(root)
            .caption(title, TITLE_FONT)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, 0.0..top)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Kelembaban (%)")
            .y_desc("Jumlah tahun")
            .draw()?;

        let fill = rgb(palette::HISTOGRAM);
        chart.draw_series(histogram.bars().map(|(left, right, count)| {
            Rectangle::new([(left, 0.0), (right, count as f64)], fill.filled())
        }))?;
        chart.draw_series(histogram.bars().map(|(left, right, count)| {
            Rectangle::new([(left, 0.0), (right, count as f64)], BLACK.stroke_width(1))
        }))?;

        if let Some(curve) = density {
            chart.draw_series(LineSeries::new(
                curve.iter().map(|p| (p[0], p[1])),
                rgb(palette::RAINFALL).stroke_width(2),
            ))?;
        }
        Ok(())
    }

    fn draw_heatmap(root: &Root, title: &str, matrix: &CorrelationMatrix) -> DrawResult {
        root.draw(&Text::new(title, (20, 10), TITLE_FONT.into_font()))?;
        if matrix.is_empty() {
            root.draw(&Text::new(
                "Tidak ada kolom numerik untuk dikorelasikan",
                (20, 60),
                LABEL_FONT.into_font(),
            ))?;
            return Ok(());
        }

        let (width, height) = root.dim_in_pixel();
        let n = matrix.len() as i32;
        let left = 140;
        let top = 80;
        let cell = ((width as i32 - left - 20) / n)
            .min((height as i32 - top - 20) / n)
            .max(12);

        let centered = TextStyle::from(CELL_FONT.into_font()).pos(Pos::new(HPos::Center, VPos::Center));
        let right_aligned =
            TextStyle::from(LABEL_FONT.into_font()).pos(Pos::new(HPos::Right, VPos::Center));
        let max_chars = (cell / 7).max(3) as usize;

        for (j, name) in matrix.columns.iter().enumerate() {
            let label: String = name.chars().take(max_chars).collect();
            root.draw(&Text::new(
                label,
                (left + j as i32 * cell + cell / 2, top - 14),
                centered.clone(),
            ))?;
        }

        for (i, name) in matrix.columns.iter().enumerate() {
            let y = top + i as i32 * cell;
            root.draw(&Text::new(
                name.clone(),
                (left - 8, y + cell / 2),
                right_aligned.clone(),
            ))?;

            for j in 0..matrix.len() {
                let x = left + j as i32 * cell;
                let value = matrix.get(i, j);
                root.draw(&Rectangle::new(
                    [(x, y), (x + cell, y + cell)],
                    rgb(coolwarm(value)).filled(),
                ))?;
                if !value.is_nan() {
                    root.draw(&Text::new(
                        format!("{:.2}", value),
                        (x + cell / 2, y + cell / 2),
                        centered.clone().color(&rgb(contrast_text(value))),
                    ))?;
                }
            }
        }
        Ok(())
    }

    fn draw_table(root: &Root, title: &str, table: &TableData) -> DrawResult {
        root.draw(&Text::new(title, (20, 10), TITLE_FONT.into_font()))?;
        let body = root.margin(50, 10, 10, 10);
        Self::draw_text_grid(&body, table, 0)
    }

    /// Header plus rows in equal-width columns; rows that do not fit are
    /// summarised in a final line.
    fn draw_text_grid(area: &Root, table: &TableData, top: i32) -> DrawResult {
        let (width, height) = area.dim_in_pixel();
        let columns = table.headers.len().max(1) as i32;
        let col_w = (width as i32 - 20) / columns;
        let row_h = 20;
        let capacity = ((height as i32 - top) / row_h - 2).max(1) as usize;

        let header_style = TextStyle::from(("sans-serif", 13).into_font().style(FontStyle::Bold));
        for (j, header) in table.headers.iter().enumerate() {
            area.draw(&Text::new(
                header.clone(),
                (10 + j as i32 * col_w, top),
                header_style.clone(),
            ))?;
        }

        for (i, row) in table.rows.iter().take(capacity).enumerate() {
            let y = top + (i as i32 + 1) * row_h;
            for (j, cell) in row.iter().enumerate() {
                area.draw(&Text::new(
                    cell.clone(),
                    (10 + j as i32 * col_w, y),
                    CELL_FONT.into_font(),
                ))?;
            }
        }

        if table.rows.len() > capacity {
            area.draw(&Text::new(
                format!("... {} more rows", table.rows.len() - capacity),
                (10, top + (capacity as i32 + 1) * row_h),
                CELL_FONT.into_font(),
            ))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::StaticChartRenderer;
    use crate::charts::{DashboardView, ViewContent, ViewKind};
    use crate::stats::{CorrelationMatrix, StatsError};

    #[test]
    fn test_empty_heatmap_renders_message() {
        let matrix = CorrelationMatrix {
            columns: Vec::new(),
            values: Vec::new(),
        };
        assert!(matrix.is_empty());
        let view = DashboardView {
            kind: ViewKind::Correlation,
            content: Ok(ViewContent::Heatmap(matrix)),
        };
        let png = StaticChartRenderer::render_view_to_png(&view, 400, 300).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_padded_range() {
        assert_eq!(StaticChartRenderer::padded((0.0, 10.0), 0.1), (-1.0, 11.0));
        // Flat series still gets a visible span
        let (lo, hi) = StaticChartRenderer::padded((27.0, 27.0), 0.1);
        assert!(lo < 27.0 && hi > 27.0);
    }

    #[test]
    fn test_error_view_is_not_rendered() {
        let view = DashboardView {
            kind: ViewKind::Anomaly,
            content: Err(StatsError::InsufficientBaseline {
                start: 1981,
                end: 2010,
            }),
        };
        let result = StaticChartRenderer::render_view_to_png(&view, 400, 300);
        assert!(matches!(result, Err(super::RenderError::Unavailable(_))));
    }
}
