use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::colorbar::{BarRect, Colorbar};
use super::colormap::ColorScale;
use super::contour::{line_levels, march_squares};
use super::error::Error;
use super::{COLORBAR_LABEL, Canvas, Points, Renderer};
use crate::landscape::{Colormap, Landscape, OverRange, RenderConfig};

const TITLE: &str = "Free Energy Landscape (ΔG)";

/// Fraction of the figure width given to the colorbar panel.
const COLORBAR_PANEL: f64 = 0.16;

/// 2D heatmap of ΔG with isocontours and a colorbar.
#[derive(Debug, Clone)]
pub struct HeatmapRenderer {
    colormap: Colormap,
    contour_step: Option<f64>,
    over_range: OverRange,
    labels: bool,
    x_label: String,
    y_label: String,
    dpi: u32,
}

impl HeatmapRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            colormap: config.colormap,
            contour_step: config.contours.then_some(config.contour_step),
            over_range: config.over_range,
            labels: config.labels,
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
            dpi: config.dpi,
        }
    }
}

impl Renderer for HeatmapRenderer {
    fn figure_size(&self) -> (f64, f64) {
        (6.0, 5.6)
    }

    fn dpi(&self) -> u32 {
        self.dpi
    }

    fn draw(&self, root: &Canvas<'_>, landscape: &Landscape) -> Result<(), Error> {
        let Landscape { grid, energy, .. } = landscape;
        let points = Points::new(self.dpi);
        let scale = ColorScale::new(self.colormap, energy.z_max());

        root.fill(&WHITE)?;
        let (width, _) = root.dim_in_pixel();
        let panel = (f64::from(width) * COLORBAR_PANEL).round() as i32;
        let (plot_panel, bar_panel) = root.split_horizontally(width as i32 - panel);

        let body = if self.labels {
            let (title_area, body) = plot_panel.split_vertically(points.px(24.0));
            let (tw, th) = title_area.dim_in_pixel();
            let style = TextStyle::from(("sans-serif", points.font(11.0)).into_font())
                .pos(Pos::new(HPos::Center, VPos::Center));
            title_area.draw(&Text::new(TITLE, (tw as i32 / 2, th as i32 / 2), style))?;
            body
        } else {
            plot_panel
        };

        let margin = points.px(6.0);
        let (x_area, y_area) = if self.labels {
            (points.px(30.0), points.px(40.0))
        } else {
            (0, 0)
        };
        let (body_w, body_h) = body.dim_in_pixel();
        let avail_w = body_w as i32 - y_area - 2 * margin;
        let avail_h = body_h as i32 - x_area - 2 * margin;

        let (x0, x1) = grid.x_range();
        let (y0, y1) = grid.y_range();
        let (plot_w, plot_h) = equal_aspect(avail_w, avail_h, x1 - x0, y1 - y0)
            .ok_or_else(|| Error::InvalidConfig("figure is too small for the plot".to_string()))?;
        let pad_x = (avail_w - plot_w) / 2;
        let pad_y = (avail_h - plot_h) / 2;

        let mut chart = ChartBuilder::on(&body)
            .margin_left(margin + pad_x)
            .margin_right(avail_w - plot_w - pad_x + margin)
            .margin_top(margin + pad_y)
            .margin_bottom(avail_h - plot_h - pad_y + margin)
            .x_label_area_size(x_area)
            .y_label_area_size(y_area)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        if self.labels {
            chart
                .configure_mesh()
                .disable_mesh()
                .x_labels(6)
                .y_labels(6)
                .x_desc(self.x_label.as_str())
                .y_desc(self.y_label.as_str())
                .label_style(("sans-serif", points.font(8.5)).into_font())
                .axis_desc_style(("sans-serif", points.font(10.0)).into_font())
                .draw()?;
        }

        let flag = self.over_range == OverRange::Flag;
        let values = energy.values();
        let mask = energy.saturation_mask();
        chart.draw_series(values.indexed_iter().map(|((i, j), &dg)| {
            let color = if flag && mask[[i, j]] {
                scale.over_color()
            } else {
                scale.color(dg)
            };
            Rectangle::new(
                [
                    (grid.x_edges[i], grid.y_edges[j]),
                    (grid.x_edges[i + 1], grid.y_edges[j + 1]),
                ],
                color.filled(),
            )
        }))?;

        if let Some(step) = self.contour_step {
            let style = BLACK.mix(0.6).stroke_width(points.px(0.35) as u32);
            for level in line_levels(energy.z_max(), step) {
                let segments = march_squares(values, &grid.x_centers, &grid.y_centers, level);
                chart.draw_series(
                    segments
                        .iter()
                        .map(|s| PathElement::new(vec![s.start, s.end], style)),
                )?;
            }
        }

        chart.plotting_area().draw(&Rectangle::new(
            [(x0, y0), (x1, y1)],
            BLACK.stroke_width(1),
        ))?;

        let (_, rows) = chart.plotting_area().get_pixel_range();
        let (_, base_y) = bar_panel.get_base_pixel();
        let colorbar = Colorbar {
            scale,
            label: COLORBAR_LABEL,
            extend_max: true,
            text: self.labels,
            points,
        };
        colorbar.draw(
            &bar_panel,
            BarRect {
                left: points.px(4.0),
                width: (f64::from(panel) * 0.2).round() as i32,
                top: rows.start - base_y,
                bottom: rows.end - base_y,
            },
        )
    }
}

/// Largest `(width, height)` in pixels inside `avail_w × avail_h` with the
/// data aspect ratio `dx : dy`.
fn equal_aspect(avail_w: i32, avail_h: i32, dx: f64, dy: f64) -> Option<(i32, i32)> {
    if avail_w < 2 || avail_h < 2 || !(dx > 0.0 && dy > 0.0) {
        return None;
    }
    let scale = (f64::from(avail_w) / dx).min(f64::from(avail_h) / dy);
    let w = ((dx * scale).floor() as i32).clamp(1, avail_w);
    let h = ((dy * scale).floor() as i32).clamp(1, avail_h);
    Some((w, h))
}
