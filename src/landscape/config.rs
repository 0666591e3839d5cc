//! Configuration for landscape construction and rendering.
//!
//! A single immutable [`RenderConfig`] is built at startup (defaults, then an
//! optional TOML file, then command-line overrides) and passed by reference to
//! every stage.
//!
//! # Overview
//!
//! - [`RenderConfig`] — Main configuration struct
//! - [`Bandwidth`] — KDE smoothing factor or selection rule
//! - [`Colormap`] — Color scheme shared by surface and colorbar
//! - [`ViewAngle`] — Camera orientation for the 3D figure
//! - [`OverRange`] — How cells clipped at `z_max` are colored

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::error::{Error, require_positive};

/// Kernel bandwidth selection.
///
/// A [`Factor`](Bandwidth::Factor) scales the sample covariance directly
/// (kernel covariance = covariance × factor²); the rules derive the factor
/// from the sample count.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Bandwidth {
    Factor(f64),
    Rule(BandwidthRule),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandwidthRule {
    Scott,
    Silverman,
}

impl Bandwidth {
    /// Resolves the covariance scaling factor for `n` two-dimensional samples.
    pub fn factor(&self, n: usize) -> f64 {
        const DIM: f64 = 2.0;
        let n = n as f64;
        match self {
            Bandwidth::Factor(f) => *f,
            Bandwidth::Rule(BandwidthRule::Scott) => n.powf(-1.0 / (DIM + 4.0)),
            Bandwidth::Rule(BandwidthRule::Silverman) => {
                (n * (DIM + 2.0) / 4.0).powf(-1.0 / (DIM + 4.0))
            }
        }
    }
}

impl Default for Bandwidth {
    fn default() -> Self {
        Bandwidth::Factor(0.15)
    }
}

impl fmt::Display for Bandwidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bandwidth::Factor(v) => write!(f, "{v}"),
            Bandwidth::Rule(BandwidthRule::Scott) => write!(f, "scott"),
            Bandwidth::Rule(BandwidthRule::Silverman) => write!(f, "silverman"),
        }
    }
}

impl FromStr for Bandwidth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scott" => Ok(Bandwidth::Rule(BandwidthRule::Scott)),
            "silverman" => Ok(Bandwidth::Rule(BandwidthRule::Silverman)),
            other => other.parse::<f64>().map(Bandwidth::Factor).map_err(|_| {
                format!("expected a positive number, 'scott' or 'silverman', got '{s}'")
            }),
        }
    }
}

/// Color scheme used for the surface, the contour floor and the colorbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Jet,
    Turbo,
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Colormap::Jet => "jet",
            Colormap::Turbo => "turbo",
            Colormap::Viridis => "viridis",
            Colormap::Plasma => "plasma",
            Colormap::Inferno => "inferno",
            Colormap::Magma => "magma",
            Colormap::Cividis => "cividis",
        };
        f.write_str(name)
    }
}

/// Coloring policy for cells whose raw ΔG exceeded `z_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverRange {
    /// Clip, then color: saturated cells take the top colormap color and the
    /// over-range color only appears on the colorbar cap.
    #[default]
    Clip,
    /// Paint saturated cells in the over-range color.
    Flag,
}

/// Camera orientation of the 3D figure, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewAngle {
    pub elevation: f64,
    pub azimuth: f64,
}

impl Default for ViewAngle {
    fn default() -> Self {
        Self {
            elevation: 28.0,
            azimuth: -40.0,
        }
    }
}

/// Immutable settings for one landscape run.
///
/// # Examples
///
/// ```
/// use felscape::{Bandwidth, Colormap, RenderConfig};
///
/// let config = RenderConfig {
///     bins: 50,
///     bandwidth: Bandwidth::Factor(0.2),
///     colormap: Colormap::Viridis,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
///
/// let from_file = RenderConfig::from_toml_str("z_max = 20.0\nbandwidth = \"scott\"").unwrap();
/// assert_eq!(from_file.z_max, 20.0);
/// assert_eq!(from_file.bins, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Grid resolution per axis.
    pub bins: usize,

    /// KDE smoothing.
    pub bandwidth: Bandwidth,

    /// Temperature in K.
    pub temperature: f64,

    /// Display ceiling for ΔG in kJ/mol.
    pub z_max: f64,

    /// Color scheme.
    pub colormap: Colormap,

    /// Draw isocontours on the 2D figure.
    pub contours: bool,

    /// Isoline spacing in kJ/mol (2D only).
    pub contour_step: f64,

    /// Camera orientation (3D only).
    pub view: ViewAngle,

    /// Coloring of saturated cells.
    pub over_range: OverRange,

    /// Draw titles, axis labels and tick text.
    ///
    /// Text rendering needs system fonts; disable on headless hosts without
    /// any installed.
    pub labels: bool,

    pub x_label: String,
    pub y_label: String,

    /// Raster resolution in dots per inch.
    pub dpi: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            bins: 100,
            bandwidth: Bandwidth::default(),
            temperature: 300.0,
            z_max: 12.0,
            colormap: Colormap::default(),
            contours: true,
            contour_step: 2.0,
            view: ViewAngle::default(),
            over_range: OverRange::default(),
            labels: true,
            x_label: "PC1".to_string(),
            y_label: "PC2".to_string(),
            dpi: 300,
        }
    }
}

impl RenderConfig {
    /// Parses a TOML document; absent keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    /// Checks every numeric setting before any work is done.
    pub fn validate(&self) -> Result<(), Error> {
        if self.bins == 0 {
            return Err(Error::invalid_parameter(
                "bins",
                self.bins,
                "must be at least 1",
            ));
        }
        if let Bandwidth::Factor(f) = self.bandwidth {
            require_positive("bandwidth", f)?;
        }
        require_positive("temperature", self.temperature)?;
        require_positive("z_max", self.z_max)?;
        if self.contours {
            require_positive("contour_step", self.contour_step)?;
        }
        let elevation = self.view.elevation;
        if !(elevation.is_finite() && (-90.0..=90.0).contains(&elevation)) {
            return Err(Error::invalid_parameter(
                "elevation",
                elevation,
                "must lie within [-90, 90] degrees",
            ));
        }
        if !self.view.azimuth.is_finite() {
            return Err(Error::invalid_parameter(
                "azimuth",
                self.view.azimuth,
                "must be a finite angle",
            ));
        }
        if !(10..=1200).contains(&self.dpi) {
            return Err(Error::invalid_parameter(
                "dpi",
                self.dpi,
                "must lie within [10, 1200]",
            ));
        }
        Ok(())
    }
}
