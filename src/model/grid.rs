use ndarray::Array1;

use super::sample::Bounds;

/// Regular mesh over the bounding box of a sample set.
///
/// Each axis carries `bins + 1` strictly increasing edges and `bins` centers,
/// the midpoints of adjacent edges. The first and last edges coincide exactly
/// with the axis minimum and maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub x_edges: Array1<f64>,
    pub y_edges: Array1<f64>,
    pub x_centers: Array1<f64>,
    pub y_centers: Array1<f64>,
}

impl Grid {
    /// Builds a `bins × bins` grid spanning `bounds`.
    ///
    /// Callers guarantee `bins >= 1` and a non-degenerate box; the
    /// estimator validates both before getting here.
    pub fn spanning(bounds: &Bounds, bins: usize) -> Self {
        let x_edges = edges(bounds.x_min, bounds.x_max, bins);
        let y_edges = edges(bounds.y_min, bounds.y_max, bins);
        let x_centers = centers(&x_edges);
        let y_centers = centers(&y_edges);
        Self {
            x_edges,
            y_edges,
            x_centers,
            y_centers,
        }
    }

    #[inline]
    pub fn bins(&self) -> usize {
        self.x_centers.len()
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.x_centers.len(), self.y_centers.len())
    }

    /// Cell-center coordinates of cell `[i, j]`.
    #[inline]
    pub fn center(&self, i: usize, j: usize) -> (f64, f64) {
        (self.x_centers[i], self.y_centers[j])
    }

    /// Index of the cell whose center is closest to `(x, y)`.
    pub fn nearest_cell(&self, x: f64, y: f64) -> (usize, usize) {
        (nearest(&self.x_centers, x), nearest(&self.y_centers, y))
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x_edges[0], self.x_edges[self.x_edges.len() - 1])
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.y_edges[0], self.y_edges[self.y_edges.len() - 1])
    }
}

fn edges(min: f64, max: f64, bins: usize) -> Array1<f64> {
    let step = (max - min) / bins as f64;
    Array1::from_shape_fn(bins + 1, |k| {
        if k == bins {
            max
        } else {
            min + k as f64 * step
        }
    })
}

fn centers(edges: &Array1<f64>) -> Array1<f64> {
    Array1::from_shape_fn(edges.len() - 1, |k| 0.5 * (edges[k] + edges[k + 1]))
}

fn nearest(axis: &Array1<f64>, value: f64) -> usize {
    axis.iter()
        .enumerate()
        .min_by(|a, b| (a.1 - value).abs().total_cmp(&(b.1 - value).abs()))
        .map(|(k, _)| k)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_bounds() -> Bounds {
        Bounds {
            x_min: 0.0,
            x_max: 1.0,
            y_min: -2.0,
            y_max: 3.0,
        }
    }

    #[test]
    fn edges_span_bounds_exactly() {
        let grid = Grid::spanning(&unit_bounds(), 7);
        assert_eq!(grid.x_edges.len(), 8);
        assert_eq!(grid.x_range(), (0.0, 1.0));
        assert_eq!(grid.y_range(), (-2.0, 3.0));
    }

    #[test]
    fn edges_are_strictly_increasing() {
        let grid = Grid::spanning(&unit_bounds(), 100);
        for w in grid.x_edges.windows(2) {
            assert!(w[0] < w[1]);
        }
        for w in grid.y_edges.windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn centers_lie_between_their_edges() {
        let grid = Grid::spanning(&unit_bounds(), 10);
        assert_eq!(grid.shape(), (10, 10));
        for k in 0..grid.bins() {
            assert!(grid.x_edges[k] < grid.x_centers[k]);
            assert!(grid.x_centers[k] < grid.x_edges[k + 1]);
            assert!(grid.y_edges[k] < grid.y_centers[k]);
            assert!(grid.y_centers[k] < grid.y_edges[k + 1]);
        }
        assert_relative_eq!(grid.x_centers[0], 0.05, epsilon = 1e-12);
        assert_relative_eq!(grid.y_centers[9], 2.75, epsilon = 1e-12);
    }

    #[test]
    fn single_bin_grid_has_one_center() {
        let grid = Grid::spanning(&unit_bounds(), 1);
        assert_eq!(grid.bins(), 1);
        assert_relative_eq!(grid.center(0, 0).0, 0.5);
        assert_relative_eq!(grid.center(0, 0).1, 0.5);
    }

    #[test]
    fn nearest_cell_picks_closest_center() {
        let grid = Grid::spanning(&unit_bounds(), 10);
        assert_eq!(grid.nearest_cell(0.0, -2.0), (0, 0));
        assert_eq!(grid.nearest_cell(1.0, 3.0), (9, 9));
        assert_eq!(grid.nearest_cell(0.51, 0.6), (5, 5));
    }
}
