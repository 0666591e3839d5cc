//! Isolines and filled isobands over the cell-center lattice.
//!
//! Lines come from marching squares with linear interpolation along cell
//! edges. Filled bands split every lattice square into two triangles and clip
//! each triangle against the band's lower and upper levels, which yields
//! polygons that tile the square without gaps.

use ndarray::{Array1, Array2};

/// Straight piece of an isoline in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

/// Polygon of one filled band in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPolygon {
    /// Index of the band, between `levels[band]` and `levels[band + 1]`.
    pub band: usize,
    pub points: Vec<(f64, f64)>,
}

/// Isoline levels `0, step, 2·step, …` up to `z_max` (with a 0.001 tolerance).
pub fn line_levels(z_max: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0 && z_max >= 0.0) {
        return Vec::new();
    }
    let limit = z_max + 0.001;
    (0..)
        .map(|k| k as f64 * step)
        .take_while(|&level| level <= limit)
        .collect()
}

/// `count` evenly spaced levels from 0 to `z_max`, endpoints included.
pub fn band_levels(z_max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = count - 1;
            (0..count)
                .map(|k| {
                    if k == last {
                        z_max
                    } else {
                        z_max * k as f64 / last as f64
                    }
                })
                .collect()
        }
    }
}

/// Extracts the isoline at `level` from `values` sampled at `(xs[i], ys[j])`.
///
/// A corner counts as inside when its value is `>= level`. Saddle squares
/// are resolved by keeping the two inside corners apart.
pub fn march_squares(
    values: &Array2<f64>,
    xs: &Array1<f64>,
    ys: &Array1<f64>,
    level: f64,
) -> Vec<Segment> {
    let (nx, ny) = values.dim();
    if nx < 2 || ny < 2 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    for i in 0..nx - 1 {
        for j in 0..ny - 1 {
            // Corners counter-clockwise from the lower left.
            let v0 = values[[i, j]];
            let v1 = values[[i + 1, j]];
            let v2 = values[[i + 1, j + 1]];
            let v3 = values[[i, j + 1]];

            let case = usize::from(v0 >= level)
                | usize::from(v1 >= level) << 1
                | usize::from(v2 >= level) << 2
                | usize::from(v3 >= level) << 3;
            if case == 0 || case == 15 {
                continue;
            }

            let (x0, x1) = (xs[i], xs[i + 1]);
            let (y0, y1) = (ys[j], ys[j + 1]);
            let bottom = || (lerp(x0, x1, v0, v1, level), y0);
            let right = || (x1, lerp(y0, y1, v1, v2, level));
            let top = || (lerp(x0, x1, v3, v2, level), y1);
            let left = || (x0, lerp(y0, y1, v0, v3, level));

            let mut push = |start, end| segments.push(Segment { start, end });
            match case {
                1 | 14 => push(left(), bottom()),
                2 | 13 => push(bottom(), right()),
                3 | 12 => push(left(), right()),
                4 | 11 => push(right(), top()),
                6 | 9 => push(bottom(), top()),
                7 | 8 => push(left(), top()),
                5 => {
                    push(left(), top());
                    push(bottom(), right());
                }
                10 => {
                    push(left(), bottom());
                    push(right(), top());
                }
                _ => {}
            }
        }
    }
    segments
}

/// Fills the bands between consecutive `levels` over the lattice.
///
/// Values outside `[levels[0], levels[last]]` are left unfilled.
pub fn fill_bands(
    values: &Array2<f64>,
    xs: &Array1<f64>,
    ys: &Array1<f64>,
    levels: &[f64],
) -> Vec<BandPolygon> {
    let (nx, ny) = values.dim();
    if nx < 2 || ny < 2 || levels.len() < 2 {
        return Vec::new();
    }

    let mut polygons = Vec::new();
    for i in 0..nx - 1 {
        for j in 0..ny - 1 {
            let p00 = (xs[i], ys[j], values[[i, j]]);
            let p10 = (xs[i + 1], ys[j], values[[i + 1, j]]);
            let p11 = (xs[i + 1], ys[j + 1], values[[i + 1, j + 1]]);
            let p01 = (xs[i], ys[j + 1], values[[i, j + 1]]);
            for triangle in [[p00, p10, p11], [p00, p11, p01]] {
                triangle_bands(&triangle, levels, &mut polygons);
            }
        }
    }
    polygons
}

type Vertex = (f64, f64, f64);

fn triangle_bands(triangle: &[Vertex; 3], levels: &[f64], out: &mut Vec<BandPolygon>) {
    let lo = triangle.iter().map(|v| v.2).fold(f64::INFINITY, f64::min);
    let hi = triangle.iter().map(|v| v.2).fold(f64::NEG_INFINITY, f64::max);

    for band in 0..levels.len() - 1 {
        let (lower, upper) = (levels[band], levels[band + 1]);
        if upper < lo || lower > hi {
            continue;
        }
        let clipped = clip(triangle, |v| v - lower);
        let clipped = clip(&clipped, |v| upper - v);
        if clipped.len() >= 3 {
            out.push(BandPolygon {
                band,
                points: clipped.iter().map(|&(x, y, _)| (x, y)).collect(),
            });
        }
    }
}

/// Keeps the part of `polygon` where `side(value) >= 0`.
fn clip(polygon: &[Vertex], side: impl Fn(f64) -> f64) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(polygon.len() + 2);
    for (k, &current) in polygon.iter().enumerate() {
        let next = polygon[(k + 1) % polygon.len()];
        let (sc, sn) = (side(current.2), side(next.2));
        if sc >= 0.0 {
            out.push(current);
        }
        if (sc >= 0.0) != (sn >= 0.0) {
            let t = sc / (sc - sn);
            out.push((
                current.0 + t * (next.0 - current.0),
                current.1 + t * (next.1 - current.1),
                current.2 + t * (next.2 - current.2),
            ));
        }
    }
    out
}

/// Coordinate between `a` and `b` where the field crosses `level`.
fn lerp(a: f64, b: f64, va: f64, vb: f64, level: f64) -> f64 {
    let dv = vb - va;
    if dv.abs() < f64::EPSILON {
        return 0.5 * (a + b);
    }
    let t = ((level - va) / dv).clamp(0.0, 1.0);
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn axes() -> (Array1<f64>, Array1<f64>) {
        (array![0.0, 1.0, 2.0], array![0.0, 1.0, 2.0])
    }

    #[test]
    fn line_levels_include_ceiling() {
        assert_eq!(
            line_levels(12.0, 2.0),
            vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0]
        );
        assert_eq!(line_levels(5.0, 2.0), vec![0.0, 2.0, 4.0]);
        assert!(line_levels(12.0, 0.0).is_empty());
    }

    #[test]
    fn band_levels_are_evenly_spaced() {
        let levels = band_levels(12.0, 100);
        assert_eq!(levels.len(), 100);
        assert_eq!(levels[0], 0.0);
        assert_eq!(levels[99], 12.0);
        assert_relative_eq!(levels[1], 12.0 / 99.0);
    }

    #[test]
    fn single_peak_gives_closed_ring() {
        let (xs, ys) = axes();
        let values = array![[0.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 0.0]];
        let segments = march_squares(&values, &xs, &ys, 2.0);
        assert_eq!(segments.len(), 4);
        for s in &segments {
            for (x, y) in [s.start, s.end] {
                let d = (x - 1.0).abs() + (y - 1.0).abs();
                assert_relative_eq!(d, 0.5, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn crossing_is_interpolated_linearly() {
        let values = array![[0.0, 0.0], [4.0, 4.0]];
        let xs = array![0.0, 1.0];
        let ys = array![0.0, 1.0];
        let segments = march_squares(&values, &xs, &ys, 1.0);
        assert_eq!(segments.len(), 1);
        assert_relative_eq!(segments[0].start.0, 0.25);
        assert_relative_eq!(segments[0].end.0, 0.25);
    }

    #[test]
    fn flat_field_has_no_lines() {
        let (xs, ys) = axes();
        let values = Array2::from_elem((3, 3), 12.0);
        assert!(march_squares(&values, &xs, &ys, 6.0).is_empty());
        assert!(march_squares(&values, &xs, &ys, 0.0).is_empty());
    }

    #[test]
    fn bands_tile_the_lattice() {
        let (xs, ys) = axes();
        let values = array![[0.0, 1.0, 2.0], [1.0, 2.0, 3.0], [2.0, 3.0, 4.0]];
        let levels = band_levels(4.0, 5);
        let polygons = fill_bands(&values, &xs, &ys, &levels);

        let area: f64 = polygons.iter().map(|p| shoelace(&p.points)).sum();
        assert_relative_eq!(area, 4.0, epsilon = 1e-9);
        assert!(polygons.iter().all(|p| p.band < 4));
    }

    #[test]
    fn constant_square_falls_in_a_single_band() {
        let values = Array2::from_elem((2, 2), 12.0);
        let xs = array![0.0, 1.0];
        let levels = band_levels(12.0, 100);
        let polygons = fill_bands(&values, &xs, &xs, &levels);
        assert!(polygons.iter().all(|p| p.band == 98));
        let area: f64 = polygons.iter().map(|p| shoelace(&p.points)).sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-9);
    }

    fn shoelace(points: &[(f64, f64)]) -> f64 {
        let n = points.len();
        let twice: f64 = (0..n)
            .map(|k| {
                let (x0, y0) = points[k];
                let (x1, y1) = points[(k + 1) % n];
                x0 * y1 - x1 * y0
            })
            .sum();
        0.5 * twice.abs()
    }
}
