mod config;
mod energy;
mod error;
mod kde;

pub use config::{Bandwidth, BandwidthRule, Colormap, OverRange, RenderConfig, ViewAngle};
pub use energy::{BOLTZMANN_KJ_PER_MOL_K, transform};
pub use error::{Axis, Error};
pub use kde::{GaussianKde, estimate};

use crate::model::field::{DensityField, EnergyField};
use crate::model::grid::Grid;
use crate::model::sample::SampleSet;

/// Grid, density and free energy computed once per run.
#[derive(Debug, Clone, PartialEq)]
pub struct Landscape {
    pub grid: Grid,
    pub density: DensityField,
    pub energy: EnergyField,
}

/// Builds the free-energy landscape of `samples`.
///
/// Validates `config`, estimates the density on a `bins × bins` grid, then
/// converts it to clipped ΔG.
///
/// # Errors
///
/// Returns the first domain error raised by validation, estimation or the
/// free-energy transform.
pub fn build_landscape(samples: &SampleSet, config: &RenderConfig) -> Result<Landscape, Error> {
    config.validate()?;

    let (grid, density) = estimate(samples, config.bandwidth, config.bins)?;
    let energy = transform(&density, config.temperature, config.z_max)?;

    if let Some((i, j, dg)) = energy.min_cell() {
        let (x, y) = grid.center(i, j);
        log::debug!("landscape minimum ΔG={dg:.3} kJ/mol at ({x:.4}, {y:.4})");
    }

    Ok(Landscape {
        grid,
        density,
        energy,
    })
}
