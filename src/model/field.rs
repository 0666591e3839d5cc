use ndarray::Array2;

use crate::landscape::Error;

/// Estimated probability density at every grid cell center.
///
/// Indexed `[[i, j]]` with `i` along x and `j` along y. Every value is finite
/// and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityField {
    values: Array2<f64>,
}

impl DensityField {
    /// Wraps raw density values, rejecting negative or non-finite entries.
    pub fn new(values: Array2<f64>) -> Result<Self, Error> {
        if let Some(((i, j), &value)) = values
            .indexed_iter()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(Error::InvalidDensity { i, j, value });
        }
        Ok(Self { values })
    }

    #[inline]
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Largest density in the field (`0.0` for an empty field).
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Clipped free energy at every grid cell center, in kJ/mol.
///
/// Values lie in `[0, z_max]`. Cells whose raw ΔG exceeded `z_max` before
/// clipping (including empty cells, where ΔG is +∞) are recorded in the
/// saturation mask so renderers can tell them apart from cells that sit
/// exactly on the ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyField {
    pub(crate) values: Array2<f64>,
    pub(crate) saturated: Array2<bool>,
    pub(crate) z_max: f64,
}

impl EnergyField {
    #[inline]
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    #[inline]
    pub fn saturation_mask(&self) -> &Array2<bool> {
        &self.saturated
    }

    #[inline]
    pub fn z_max(&self) -> f64 {
        self.z_max
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    #[inline]
    pub fn is_saturated(&self, i: usize, j: usize) -> bool {
        self.saturated[[i, j]]
    }

    pub fn saturated_count(&self) -> usize {
        self.saturated.iter().filter(|&&s| s).count()
    }

    /// Cell holding the global minimum, first in row-major order on ties.
    pub fn min_cell(&self) -> Option<(usize, usize, f64)> {
        self.values
            .indexed_iter()
            .fold(None, |best, ((i, j), &v)| match best {
                Some((_, _, b)) if b <= v => best,
                _ => Some((i, j, v)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn density_rejects_negative_values() {
        let err = DensityField::new(array![[0.1, 0.2], [-0.3, 0.0]]).unwrap_err();
        assert!(matches!(err, Error::InvalidDensity { i: 1, j: 0, .. }));
    }

    #[test]
    fn density_rejects_non_finite_values() {
        let err = DensityField::new(array![[0.1, f64::NAN]]).unwrap_err();
        assert!(matches!(err, Error::InvalidDensity { i: 0, j: 1, .. }));
        assert!(DensityField::new(array![[f64::INFINITY]]).is_err());
    }

    #[test]
    fn density_max_of_all_zero_field_is_zero() {
        let field = DensityField::new(Array2::zeros((3, 3))).unwrap();
        assert_eq!(field.max(), 0.0);
        assert_eq!(field.shape(), (3, 3));
    }

    #[test]
    fn energy_min_cell_and_saturation_count() {
        let field = EnergyField {
            values: array![[3.0, 12.0], [0.0, 12.0]],
            saturated: array![[false, true], [false, false]],
            z_max: 12.0,
        };
        assert_eq!(field.min_cell(), Some((1, 0, 0.0)));
        assert_eq!(field.saturated_count(), 1);
        assert!(field.is_saturated(0, 1));
        assert!(!field.is_saturated(1, 1));
        assert_eq!(field.value(1, 1), 12.0);
    }
}
