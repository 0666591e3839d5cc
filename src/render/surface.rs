use ndarray::Array1;
use plotters::coord::CoordTranslate;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::colorbar::{BarRect, Colorbar};
use super::colormap::ColorScale;
use super::contour::{band_levels, fill_bands};
use super::error::Error;
use super::{COLORBAR_LABEL, Canvas, Points, Renderer};
use crate::landscape::{Colormap, Landscape, OverRange, RenderConfig, ViewAngle};

/// Number of evenly spaced levels of the filled contour floor.
const FLOOR_LEVELS: usize = 100;

/// Box aspect of (x, y, ΔG).
const BOX_ASPECT: (f64, f64, f64) = (1.0, 1.0, 0.6);

const COLORBAR_PANEL: f64 = 0.14;

/// 3D ΔG surface over a filled contour floor, with a colorbar.
#[derive(Debug, Clone)]
pub struct SurfaceRenderer {
    colormap: Colormap,
    view: ViewAngle,
    over_range: OverRange,
    labels: bool,
    x_label: String,
    y_label: String,
    dpi: u32,
}

/// One surface patch between four neighbouring mesh nodes.
struct Quad {
    corners: [(f64, f64, f64); 4],
    color: RGBColor,
    depth: i32,
}

impl SurfaceRenderer {
    pub fn new(config: &RenderConfig) -> Self {
        Self {
            colormap: config.colormap,
            view: config.view,
            over_range: config.over_range,
            labels: config.labels,
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
            dpi: config.dpi,
        }
    }

    /// Writes the axis names next to the projected `anchors` of the x edge,
    /// the y edge and the top of the ΔG axis.
    fn draw_axis_names(
        &self,
        root: &Canvas<'_>,
        points: Points,
        anchors: [(i32, i32); 3],
    ) -> Result<(), Error> {
        let offset = points.px(18.0);
        let style = TextStyle::from(("sans-serif", points.font(10.0)).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        let names = [
            (self.x_label.as_str(), (0, offset)),
            (self.y_label.as_str(), (offset, offset / 2)),
            (COLORBAR_LABEL, (0, -offset)),
        ];
        for ((name, (dx, dy)), (px, py)) in names.into_iter().zip(anchors) {
            root.draw(&Text::new(name, (px + dx, py + dy), style.clone()))?;
        }
        Ok(())
    }
}

impl Renderer for SurfaceRenderer {
    fn figure_size(&self) -> (f64, f64) {
        (7.2, 6.2)
    }

    fn dpi(&self) -> u32 {
        self.dpi
    }

    fn draw(&self, root: &Canvas<'_>, landscape: &Landscape) -> Result<(), Error> {
        let Landscape { grid, energy, .. } = landscape;
        let (nx, ny) = energy.shape();

        let points = Points::new(self.dpi);
        let z_max = energy.z_max();
        let scale = ColorScale::new(self.colormap, z_max);

        root.fill(&WHITE)?;
        let (width, height) = root.dim_in_pixel();
        let panel = (f64::from(width) * COLORBAR_PANEL).round() as i32;
        let (plot_panel, bar_panel) = root.split_horizontally(width as i32 - panel);

        let (x0, x1) = grid.x_range();
        let (y0, y1) = grid.y_range();

        // plotters puts its second axis vertical, so ΔG goes in the middle.
        let mut chart = ChartBuilder::on(&plot_panel)
            .margin(points.px(6.0))
            .build_cartesian_3d(x0..x1, 0.0..z_max, y0..y1)?;

        let (plot_w, plot_h) = plot_panel.dim_in_pixel();
        let side = f64::from(plot_w.min(plot_h)) * 0.62;
        chart.set_3d_pixel_range((
            (side * BOX_ASPECT.0) as i32,
            (side * BOX_ASPECT.2) as i32,
            (side * BOX_ASPECT.1) as i32,
        ));
        let ViewAngle {
            elevation,
            azimuth,
        } = self.view;
        chart.with_projection(|mut pb| {
            pb.pitch = elevation.to_radians();
            pb.yaw = azimuth.to_radians();
            pb.scale = 0.9;
            pb.into_matrix()
        });

        if self.labels {
            chart
                .configure_axes()
                .light_grid_style(BLACK.mix(0.08))
                .max_light_lines(2)
                .label_style(("sans-serif", points.font(8.0)).into_font())
                .x_labels(5)
                .y_labels(7)
                .z_labels(5)
                .draw()?;
        } else {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![
                    (x0, 0.0, y0),
                    (x1, 0.0, y0),
                    (x1, 0.0, y1),
                    (x0, 0.0, y1),
                    (x0, 0.0, y0),
                ],
                BLACK.stroke_width(1),
            )))?;
        }

        let values = energy.values();
        if nx < 2 || ny < 2 {
            let level = values.mean().unwrap_or(0.0);
            let rect = vec![(x0, 0.0, y0), (x1, 0.0, y0), (x1, 0.0, y1), (x0, 0.0, y1)];
            chart.draw_series(std::iter::once(Polygon::new(
                rect,
                scale.color(level).filled(),
            )))?;
        } else {
            let levels = band_levels(z_max, FLOOR_LEVELS);
            let floor = fill_bands(values, &grid.x_centers, &grid.y_centers, &levels);
            chart.draw_series(floor.iter().map(|polygon| {
                let mid = 0.5 * (levels[polygon.band] + levels[polygon.band + 1]);
                let outline: Vec<_> = polygon.points.iter().map(|&(x, y)| (x, 0.0, y)).collect();
                Polygon::new(outline, scale.color(mid).filled())
            }))?;
        }

        let flag = self.over_range == OverRange::Flag;
        let mask = energy.saturation_mask();
        let coord = chart.as_coord_spec();
        let xs = mesh_nodes(&grid.x_centers, &grid.x_edges);
        let ys = mesh_nodes(&grid.y_centers, &grid.y_edges);
        let mut quads = Vec::with_capacity((xs.len() - 1) * (ys.len() - 1));
        for (xa, xb) in xs.iter().zip(&xs[1..]) {
            for (ya, yb) in ys.iter().zip(&ys[1..]) {
                let nodes = [(xa, ya), (xb, ya), (xb, yb), (xa, yb)];
                let corners = nodes.map(|(&(x, a), &(y, b))| (x, values[[a, b]], y));
                let color = if flag && nodes.iter().all(|&(&(_, a), &(_, b))| mask[[a, b]]) {
                    scale.over_color()
                } else {
                    scale.color(corners.iter().map(|c| c.1).sum::<f64>() / 4.0)
                };
                let (cx, cy) = (0.5 * (xa.0 + xb.0), 0.5 * (ya.0 + yb.0));
                let (_, depth) = coord.translate(&(cx, 0.0, cy));
                quads.push(Quad {
                    corners,
                    color,
                    depth,
                });
            }
        }

        // Far patches sit higher on screen when seen from above.
        quads.sort_by_key(|q| q.depth);
        if elevation < 0.0 {
            quads.reverse();
        }
        chart.draw_series(
            quads
                .iter()
                .map(|q| Polygon::new(q.corners.to_vec(), q.color.filled())),
        )?;

        if self.labels {
            let coord = chart.as_coord_spec();
            let (xm, ym) = (0.5 * (x0 + x1), 0.5 * (y0 + y1));
            let anchors = [
                coord.translate(&(xm, 0.0, y0)),
                coord.translate(&(x1, 0.0, ym)),
                coord.translate(&(x0, z_max, y0)),
            ];
            self.draw_axis_names(root, points, anchors)?;
        }

        let bar_height = (f64::from(height) * 0.55).round() as i32;
        let top = (height as i32 - bar_height) / 2;
        let colorbar = Colorbar {
            scale,
            label: COLORBAR_LABEL,
            extend_max: flag,
            text: self.labels,
            points,
        };
        colorbar.draw(
            &bar_panel,
            BarRect {
                left: points.px(4.0),
                width: (f64::from(panel) * 0.18).round() as i32,
                top,
                bottom: top + bar_height,
            },
        )
    }
}

/// Mesh nodes along one axis as `(coordinate, cell index)`.
///
/// Nodes sit on the cell centers. An axis with a single cell spans its two
/// edges instead, so the lone cell still draws as a flat patch.
fn mesh_nodes(centers: &Array1<f64>, edges: &Array1<f64>) -> Vec<(f64, usize)> {
    if centers.len() < 2 {
        return vec![(edges[0], 0), (edges[edges.len() - 1], 0)];
    }
    centers.iter().copied().zip(0..).collect()
}
