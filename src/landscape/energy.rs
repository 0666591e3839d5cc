//! Boltzmann inversion of a density field into free energy.

use ndarray::{Array2, Zip};

use super::error::{Error, require_positive};
use crate::model::field::{DensityField, EnergyField};

/// Boltzmann constant in kJ·mol⁻¹·K⁻¹.
pub const BOLTZMANN_KJ_PER_MOL_K: f64 = 0.008314;

/// Converts densities to ΔG = −k_B·T·ln(ρ/ρ_max), clipped to `[0, z_max]`.
///
/// Raw values at or below zero (the maximum cell and rounding artefacts near
/// it) map to exactly `+0.0`. Raw values above `z_max`, including the +∞ of
/// empty cells, are clamped to `z_max` and marked in the saturation mask.
///
/// # Arguments
///
/// * `density` — Density at each grid cell
/// * `temperature` — Temperature in K
/// * `z_max` — ΔG ceiling in kJ/mol
///
/// # Errors
///
/// Returns a domain error for a non-positive temperature or ceiling, and for
/// a density field whose maximum is not positive.
///
/// # Examples
///
/// ```
/// use felscape::{DensityField, transform};
/// use ndarray::array;
///
/// let density = DensityField::new(array![[1.0, 0.5], [0.0, 1e-30]])?;
/// let energy = transform(&density, 300.0, 12.0)?;
///
/// assert_eq!(energy.value(0, 0), 0.0);
/// assert!((energy.value(0, 1) - 1.7289).abs() < 1e-3);
/// assert_eq!(energy.value(1, 0), 12.0);
/// assert!(energy.is_saturated(1, 0));
/// # Ok::<(), felscape::DomainError>(())
/// ```
pub fn transform(
    density: &DensityField,
    temperature: f64,
    z_max: f64,
) -> Result<EnergyField, Error> {
    let temperature = require_positive("temperature", temperature)?;
    let z_max = require_positive("z_max", z_max)?;

    let rho_max = density.max();
    if rho_max <= 0.0 {
        return Err(Error::EmptyDensity { max: rho_max });
    }

    let kt = BOLTZMANN_KJ_PER_MOL_K * temperature;
    let shape = density.shape();
    let mut values = Array2::<f64>::zeros(shape);
    let mut saturated = Array2::from_elem(shape, false);

    Zip::from(&mut values)
        .and(&mut saturated)
        .and(density.values())
        .for_each(|dg, sat, &rho| {
            let raw = -kt * (rho / rho_max).ln();
            (*dg, *sat) = clip(raw, z_max);
        });

    let field = EnergyField {
        values,
        saturated,
        z_max,
    };

    let n_sat = field.saturated_count();
    log::debug!(
        "free energy: kT={kt:.4} kJ/mol, rho_max={rho_max:.4e}, {n_sat} of {} cells saturated at {z_max} kJ/mol",
        shape.0 * shape.1
    );
    if n_sat * 2 > shape.0 * shape.1 {
        log::warn!(
            "{n_sat} of {} cells exceed z_max = {z_max} kJ/mol; consider a larger bandwidth or ceiling",
            shape.0 * shape.1
        );
    }

    Ok(field)
}

/// Clamps a raw ΔG into `[0, z_max]`, reporting whether it was saturated.
#[inline]
fn clip(raw: f64, z_max: f64) -> (f64, bool) {
    if raw > z_max {
        (z_max, true)
    } else if raw > 0.0 {
        (raw, false)
    } else {
        (0.0, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn field(values: Array2<f64>) -> DensityField {
        DensityField::new(values).unwrap()
    }

    #[test]
    fn maximum_cell_maps_to_positive_zero() {
        let energy = transform(&field(array![[0.25, 0.5], [0.125, 0.5]]), 300.0, 12.0).unwrap();
        assert_eq!(energy.value(0, 1).to_bits(), 0.0f64.to_bits());
        assert_eq!(energy.value(1, 1).to_bits(), 0.0f64.to_bits());
    }

    #[test]
    fn values_follow_boltzmann_relation() {
        let energy = transform(&field(array![[1.0, 0.5, 0.1]]), 300.0, 100.0).unwrap();
        let kt = BOLTZMANN_KJ_PER_MOL_K * 300.0;
        assert_relative_eq!(energy.value(0, 1), kt * 2f64.ln(), max_relative = 1e-12);
        assert_relative_eq!(energy.value(0, 2), kt * 10f64.ln(), max_relative = 1e-12);
    }

    #[test]
    fn all_values_lie_within_range() {
        let values = Array2::from_shape_fn((30, 30), |(i, j)| {
            let r2 = ((i as f64 - 15.0).powi(2) + (j as f64 - 10.0).powi(2)) / 20.0;
            (-r2).exp()
        });
        let energy = transform(&field(values), 300.0, 12.0).unwrap();
        assert!(energy.values().iter().all(|&v| (0.0..=12.0).contains(&v)));
        assert!(energy.saturated_count() > 0);
    }

    #[test]
    fn transform_is_strictly_decreasing_in_density() {
        let densities = [1.0, 0.9, 0.5, 0.2, 0.05, 1e-3];
        let values = Array2::from_shape_fn((1, densities.len()), |(_, j)| densities[j]);
        let energy = transform(&field(values), 310.0, 1000.0).unwrap();
        for j in 1..densities.len() {
            assert!(energy.value(0, j - 1) < energy.value(0, j));
        }
    }

    #[test]
    fn saturation_marks_only_cells_above_ceiling() {
        let kt = BOLTZMANN_KJ_PER_MOL_K * 300.0;
        let at_ceiling = (-4.0 / kt).exp();
        let energy = transform(
            &field(array![[1.0, 0.0, 1e-9, at_ceiling * 1.01]]),
            300.0,
            4.0,
        )
        .unwrap();
        assert!(!energy.is_saturated(0, 0));
        assert!(energy.is_saturated(0, 1));
        assert!(energy.is_saturated(0, 2));
        assert!(!energy.is_saturated(0, 3));
        assert_eq!(energy.value(0, 1), 4.0);
        assert_eq!(energy.value(0, 2), 4.0);
        assert!(energy.value(0, 3) < 4.0);
    }

    #[test]
    fn rejects_zero_density_field() {
        let err = transform(&field(Array2::zeros((4, 4))), 300.0, 12.0).unwrap_err();
        assert!(matches!(err, Error::EmptyDensity { .. }));
    }

    #[test]
    fn rejects_non_positive_temperature() {
        for t in [0.0, -10.0] {
            let err = transform(&field(array![[1.0]]), t, 12.0).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidParameter {
                    name: "temperature",
                    ..
                }
            ));
        }
    }

    #[test]
    fn rejects_non_positive_ceiling() {
        let err = transform(&field(array![[1.0]]), 300.0, 0.0).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "z_max", .. }));
    }
}
