//! A pure Rust library for free-energy landscapes of two collective variables.
//! It estimates the sampled probability density with a Gaussian kernel, converts it
//! to ΔG by Boltzmann inversion and renders publication-ready 2D or 3D figures.
//!
//! # Features
//!
//! - **Density estimation** — Gaussian KDE with covariance-scaled kernels,
//!   a fixed bandwidth factor or Scott/Silverman rules, order-independent results
//! - **Free energy** — ΔG = −k_B·T·ln(ρ/ρ_max) clipped to a display ceiling,
//!   with a saturation mask for cells beyond it
//! - **Figures** — 2D heatmap with isocontours, or 3D surface over a filled
//!   contour floor, each with one shared colorbar; PNG, JPEG or BMP output
//! - **Input** — Two-column text and GROMACS `.xvg` projections
//!
//! # Quick Start
//!
//! The main entry point is [`build_landscape`], which takes a [`SampleSet`] and
//! a [`RenderConfig`] and produces a [`Landscape`] ready for rendering:
//!
//! ```
//! use felscape::{RenderConfig, SampleSet, build_landscape};
//! use felscape::DomainError;
//!
//! // Two basins on the diagonal
//! let samples = SampleSet::from(vec![(0.0, 0.0), (0.0, 0.01), (1.0, 1.0), (1.0, 1.01)]);
//!
//! let config = RenderConfig {
//!     bins: 10,
//!     ..Default::default()
//! };
//! let landscape = build_landscape(&samples, &config)?;
//!
//! // ΔG is zero at the most populated cell and capped at z_max elsewhere
//! let energy = &landscape.energy;
//! assert_eq!(energy.shape(), (10, 10));
//! assert!(energy.values().iter().all(|&g| (0.0..=12.0).contains(&g)));
//!
//! let (i, j) = landscape.grid.nearest_cell(0.5, 0.5);
//! assert!(energy.is_saturated(i, j));
//! # Ok::<(), DomainError>(())
//! ```
//!
//! Rendering goes through a [`Renderer`] chosen by [`RenderMode`]:
//!
//! ```no_run
//! use std::path::Path;
//! use felscape::{RenderConfig, RenderMode, build_landscape, io, render_to_file};
//!
//! let samples = io::read_samples_from_path("2Dproj_PC1_PC2.xvg")?;
//! let config = RenderConfig::default();
//! let landscape = build_landscape(&samples, &config)?;
//!
//! let renderer = RenderMode::Flat.renderer(&config);
//! let name = RenderMode::Flat.default_file_name(config.z_max);
//! render_to_file(renderer.as_ref(), &landscape, Path::new(&name))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — Reading sample pairs from text
//! - [`render`] — Heatmap and surface renderers, colormaps, contours
//! - [`build_landscape`] — Estimation followed by the free-energy transform
//!
//! # Data Types
//!
//! - [`SampleSet`] / [`SamplePair`] — Observed collective-variable pairs
//! - [`Grid`] — Regular mesh over the samples' bounding box
//! - [`DensityField`] — KDE density at every cell center
//! - [`EnergyField`] — Clipped ΔG with its saturation mask
//! - [`Landscape`] — Grid, density and energy of one run
//! - [`RenderConfig`] — Every setting of a run, loadable from TOML

mod landscape;
mod model;

pub mod io;
pub mod render;

pub use model::field::{DensityField, EnergyField};
pub use model::grid::Grid;
pub use model::sample::{Bounds, SamplePair, SampleSet};

pub use landscape::{
    Axis, BOLTZMANN_KJ_PER_MOL_K, Bandwidth, BandwidthRule, Colormap, GaussianKde, Landscape,
    OverRange, RenderConfig, ViewAngle, build_landscape, estimate, transform,
};

pub use render::{
    HeatmapRenderer, ImageFormat, Raster, RenderMode, Renderer, SurfaceRenderer,
    render_to_buffer, render_to_file,
};

pub use landscape::Error as DomainError;
pub use render::Error as RenderError;
pub use io::Error as InputFormatError;
