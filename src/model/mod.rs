//! Core data structures flowing through the free-energy pipeline.
//!
//! - [`sample`] – Collective-variable observations and their bounding box.
//! - [`grid`] – Regular evaluation mesh (edges and cell centers) over the samples.
//! - [`field`] – Density and free-energy values sampled on that mesh.
//!
//! Raw observations ([`SampleSet`]) are kept apart from the derived fields
//! ([`DensityField`], [`EnergyField`]) so the [`crate::landscape`] stages can
//! each consume one representation and produce the next.
//!
//! [`SampleSet`]: sample::SampleSet
//! [`DensityField`]: field::DensityField
//! [`EnergyField`]: field::EnergyField

pub mod field;
pub mod grid;
pub mod sample;
