use colorous::Gradient;
use plotters::style::RGBColor;

use crate::landscape::Colormap;

/// Color for values above the top of the scale.
pub const OVER_COLOR: RGBColor = RGBColor(255, 0, 0);

/// `(position, value)` breakpoints of the classic jet channels.
const JET_RED: [(f64, f64); 5] = [(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const JET_GREEN: [(f64, f64); 6] = [
    (0.0, 0.0),
    (0.125, 0.0),
    (0.375, 1.0),
    (0.64, 1.0),
    (0.91, 0.0),
    (1.0, 0.0),
];
const JET_BLUE: [(f64, f64); 5] = [(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];

/// Maps ΔG values in `[0, z_max]` onto a colormap.
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    colormap: Colormap,
    z_max: f64,
}

impl ColorScale {
    pub fn new(colormap: Colormap, z_max: f64) -> Self {
        Self { colormap, z_max }
    }

    #[inline]
    pub fn z_max(&self) -> f64 {
        self.z_max
    }

    /// Color of `value`, clamped into `[0, z_max]`.
    pub fn color(&self, value: f64) -> RGBColor {
        sample(self.colormap, value / self.z_max)
    }

    pub fn over_color(&self) -> RGBColor {
        OVER_COLOR
    }
}

/// Evaluates `colormap` at `t`, clamped into `[0, 1]`.
pub fn sample(colormap: Colormap, t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    match colormap {
        Colormap::Jet => RGBColor(
            channel(&JET_RED, t),
            channel(&JET_GREEN, t),
            channel(&JET_BLUE, t),
        ),
        Colormap::Turbo => gradient(colorous::TURBO, t),
        Colormap::Viridis => gradient(colorous::VIRIDIS, t),
        Colormap::Plasma => gradient(colorous::PLASMA, t),
        Colormap::Inferno => gradient(colorous::INFERNO, t),
        Colormap::Magma => gradient(colorous::MAGMA, t),
        Colormap::Cividis => gradient(colorous::CIVIDIS, t),
    }
}

fn gradient(gradient: Gradient, t: f64) -> RGBColor {
    let (r, g, b) = gradient.eval_continuous(t).as_tuple();
    RGBColor(r, g, b)
}

fn channel(points: &[(f64, f64)], t: f64) -> u8 {
    let value = points
        .windows(2)
        .find(|w| t <= w[1].0)
        .map(|w| {
            let (x0, y0) = w[0];
            let (x1, y1) = w[1];
            y0 + (t - x0) / (x1 - x0) * (y1 - y0)
        })
        .unwrap_or(points[points.len() - 1].1);
    (value * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jet_endpoints_and_midpoint() {
        assert_eq!(sample(Colormap::Jet, 0.0), RGBColor(0, 0, 128));
        assert_eq!(sample(Colormap::Jet, 1.0), RGBColor(128, 0, 0));
        let mid = sample(Colormap::Jet, 0.5);
        assert!(mid.1 == 255, "jet midpoint should be green-dominant: {mid:?}");
    }

    #[test]
    fn values_outside_unit_interval_are_clamped() {
        for map in [Colormap::Jet, Colormap::Viridis, Colormap::Turbo] {
            assert_eq!(sample(map, -3.0), sample(map, 0.0));
            assert_eq!(sample(map, 7.0), sample(map, 1.0));
            assert_eq!(sample(map, f64::NAN), sample(map, 0.0));
        }
    }

    #[test]
    fn scale_normalizes_by_ceiling() {
        let scale = ColorScale::new(Colormap::Viridis, 12.0);
        assert_eq!(scale.color(6.0), sample(Colormap::Viridis, 0.5));
        assert_eq!(scale.color(12.0), scale.color(40.0));
    }

    #[test]
    fn top_of_scale_differs_from_over_color() {
        let colormaps = [
            Colormap::Jet,
            Colormap::Turbo,
            Colormap::Viridis,
            Colormap::Plasma,
            Colormap::Inferno,
            Colormap::Magma,
            Colormap::Cividis,
        ];
        for map in colormaps {
            assert_ne!(ColorScale::new(map, 1.0).color(1.0), OVER_COLOR, "{map}");
        }
    }
}
