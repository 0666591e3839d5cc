//! Error types for landscape construction.
//!
//! Every variant describes a degenerate statistical input or an out-of-range
//! parameter, with enough context to tell the caller which setting or
//! condition to fix.

use std::fmt;

use thiserror::Error;

/// Sample axis named in variance diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Errors raised while estimating density or converting it to free energy.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to parse a TOML configuration document.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A numeric parameter is outside its valid range.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name as it appears in the configuration.
        name: &'static str,
        /// Offending value, formatted.
        value: String,
        /// Constraint that was violated.
        reason: &'static str,
    },

    /// Fewer than two samples were supplied.
    #[error("density estimation needs at least 2 samples, found {found}")]
    TooFewSamples { found: usize },

    /// Every sample sits on the same point.
    #[error("all {count} samples coincide; the sample covariance is zero")]
    CoincidentSamples { count: usize },

    /// One collective variable never changes.
    #[error("samples have zero variance along the {axis} axis")]
    ZeroVariance { axis: Axis },

    /// The samples lie on a line, so the kernel covariance cannot be inverted.
    #[error("sample covariance is singular (determinant {determinant:e}); samples are collinear")]
    SingularCovariance { determinant: f64 },

    /// A density value is negative or not finite.
    #[error("density at cell [{i}, {j}] is {value}; densities must be finite and non-negative")]
    InvalidDensity { i: usize, j: usize, value: f64 },

    /// The density maximum is not positive, so ΔG cannot be normalized.
    #[error("density field maximum is {max}; free energy needs a positive maximum")]
    EmptyDensity { max: f64 },
}

impl Error {
    /// Creates an [`InvalidParameter`](Error::InvalidParameter) error.
    ///
    /// # Arguments
    ///
    /// * `name` — Parameter name
    /// * `value` — Rejected value
    /// * `reason` — Constraint the value violated
    pub fn invalid_parameter(
        name: &'static str,
        value: impl fmt::Display,
        reason: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

/// Returns an error unless `value` is finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64, Error> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::invalid_parameter(
            name,
            value,
            "must be a finite number greater than zero",
        ))
    }
}
