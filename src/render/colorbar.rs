use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::colormap::ColorScale;
use super::error::Error;
use super::Points;

/// Most tick labels drawn along the bar.
const MAX_TICKS: f64 = 20.0;

/// Vertical color scale with integer ticks.
pub(crate) struct Colorbar<'a> {
    pub scale: ColorScale,
    pub label: &'a str,
    /// Draw a triangular cap in the over-range color above the bar.
    pub extend_max: bool,
    /// Draw tick labels and the bar label.
    pub text: bool,
    pub points: Points,
}

/// Pixel placement of the bar inside its drawing area.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BarRect {
    pub left: i32,
    pub width: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Colorbar<'_> {
    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        rect: BarRect,
    ) -> Result<(), Error> {
        let BarRect {
            left,
            width,
            top,
            bottom,
        } = rect;
        let height = bottom - top;
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidConfig(
                "no room left for the colorbar".to_string(),
            ));
        }
        let right = left + width;
        let z_max = self.scale.z_max();

        for row in top..bottom {
            let t = f64::from(bottom - row) - 0.5;
            let value = z_max * t / f64::from(height);
            area.draw(&Rectangle::new(
                [(left, row), (right, row + 1)],
                self.scale.color(value).filled(),
            ))?;
        }

        if self.extend_max {
            area.draw(&Polygon::new(
                vec![(left, top), (right, top), (left + width / 2, top - width)],
                self.scale.over_color().filled(),
            ))?;
        }

        area.draw(&Rectangle::new(
            [(left, top), (right, bottom)],
            BLACK.stroke_width(1),
        ))?;

        let tick_len = self.points.px(3.0);
        let font_px = self.points.font(8.5);
        let step = (z_max / MAX_TICKS).ceil().max(1.0);
        let mut tick = 0.0;
        while tick <= z_max {
            let y = bottom - (tick / z_max * f64::from(height)).round() as i32;
            area.draw(&PathElement::new(
                vec![(right, y), (right + tick_len, y)],
                BLACK.stroke_width(1),
            ))?;
            if self.text {
                let style = TextStyle::from(("sans-serif", font_px).into_font())
                    .pos(Pos::new(HPos::Left, VPos::Center));
                area.draw(&Text::new(
                    format!("{tick}"),
                    (right + tick_len + self.points.px(2.0), y),
                    style,
                ))?;
            }
            tick += step;
        }

        if self.text {
            let style = TextStyle::from(
                ("sans-serif", self.points.font(10.0))
                    .into_font()
                    .style(FontStyle::Bold)
                    .transform(FontTransform::Rotate90),
            )
            .pos(Pos::new(HPos::Center, VPos::Center));
            let x = right + tick_len + self.points.px(22.0);
            area.draw(&Text::new(self.label, (x, (top + bottom) / 2), style))?;
        }

        Ok(())
    }
}
