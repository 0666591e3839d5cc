//! Gaussian kernel density estimation over scattered 2D samples.
//!
//! The estimator follows the conventions of SciPy's `gaussian_kde`: the kernel
//! covariance is the unbiased sample covariance scaled by the square of the
//! bandwidth factor, and every sample carries the same weight.

use std::f64::consts::PI;

use ndarray::Array2;

use super::config::Bandwidth;
use super::error::{Axis, Error, require_positive};
use crate::model::field::DensityField;
use crate::model::grid::Grid;
use crate::model::sample::{SamplePair, SampleSet};

/// Fitted Gaussian KDE.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    /// Samples in canonical order.
    points: Vec<SamplePair>,
    /// Inverse of the kernel covariance, `[[a, b], [b, c]]`.
    inv_cov: [[f64; 2]; 2],
    /// `1 / (n · 2π · √det Σ)`.
    norm: f64,
    factor: f64,
}

impl GaussianKde {
    /// Fits the estimator to `samples`.
    ///
    /// # Errors
    ///
    /// Returns a domain error for fewer than two samples, coincident samples,
    /// a zero-variance axis, collinear samples or a non-positive bandwidth.
    pub fn fit(samples: &SampleSet, bandwidth: Bandwidth) -> Result<Self, Error> {
        let n = samples.len();
        if n < 2 {
            return Err(Error::TooFewSamples { found: n });
        }
        let factor = require_positive("bandwidth", bandwidth.factor(n))?;

        let points = samples.canonical();
        if points.windows(2).all(|w| w[0] == w[1]) {
            return Err(Error::CoincidentSamples { count: n });
        }

        let first = points[0];
        if points.iter().all(|p| p.x == first.x) {
            return Err(Error::ZeroVariance { axis: Axis::X });
        }
        if points.iter().all(|p| p.y == first.y) {
            return Err(Error::ZeroVariance { axis: Axis::Y });
        }

        let cov = sample_covariance(&points);

        let f2 = factor * factor;
        let (sxx, sxy, syy) = (cov[0][0] * f2, cov[0][1] * f2, cov[1][1] * f2);
        let det = sxx * syy - sxy * sxy;
        if !(det.is_finite() && det > f64::EPSILON * sxx * syy) {
            return Err(Error::SingularCovariance { determinant: det });
        }

        let inv_cov = [[syy / det, -sxy / det], [-sxy / det, sxx / det]];
        let norm = 1.0 / (n as f64 * 2.0 * PI * det.sqrt());

        log::debug!(
            "fitted KDE: n={n}, factor={factor:.4}, kernel covariance=[[{sxx:.4e}, {sxy:.4e}], [{sxy:.4e}, {syy:.4e}]]"
        );

        Ok(Self {
            points,
            inv_cov,
            norm,
            factor,
        })
    }

    /// Covariance scaling factor actually used.
    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Density at `(x, y)`.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let [[a, b], [_, c]] = self.inv_cov;
        let sum: f64 = self
            .points
            .iter()
            .map(|p| {
                let dx = x - p.x;
                let dy = y - p.y;
                let m = a * dx * dx + 2.0 * b * dx * dy + c * dy * dy;
                (-0.5 * m).exp()
            })
            .sum();
        sum * self.norm
    }

    /// Evaluates the density at every cell center of `grid`.
    pub fn evaluate_grid(&self, grid: &Grid) -> Array2<f64> {
        Array2::from_shape_fn(grid.shape(), |(i, j)| {
            let (x, y) = grid.center(i, j);
            self.evaluate(x, y)
        })
    }
}

/// Estimates the sample density on a `bins × bins` grid over the samples'
/// bounding box.
///
/// The result does not depend on the order of `samples`.
///
/// # Arguments
///
/// * `samples` — Observed (x, y) pairs
/// * `bandwidth` — KDE smoothing factor or rule
/// * `bins` — Grid resolution per axis
///
/// # Errors
///
/// Returns a domain error when `bins` is zero or the samples cannot support
/// a two-dimensional kernel (see [`GaussianKde::fit`]).
pub fn estimate(
    samples: &SampleSet,
    bandwidth: Bandwidth,
    bins: usize,
) -> Result<(Grid, DensityField), Error> {
    if bins == 0 {
        return Err(Error::invalid_parameter("bins", bins, "must be at least 1"));
    }
    let kde = GaussianKde::fit(samples, bandwidth)?;
    let bounds = samples
        .bounds()
        .ok_or(Error::TooFewSamples { found: 0 })?;
    let grid = Grid::spanning(&bounds, bins);
    let density = DensityField::new(kde.evaluate_grid(&grid))?;
    Ok((grid, density))
}

/// Unbiased (n − 1) covariance of the points, summed in the given order.
fn sample_covariance(points: &[SamplePair]) -> [[f64; 2]; 2] {
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let (mx, my) = (sx / n, sy / n);
    let (xx, xy, yy) = points.iter().fold((0.0, 0.0, 0.0), |(xx, xy, yy), p| {
        let dx = p.x - mx;
        let dy = p.y - my;
        (xx + dx * dx, xy + dx * dy, yy + dy * dy)
    });
    let d = n - 1.0;
    [[xx / d, xy / d], [xy / d, yy / d]]
}
