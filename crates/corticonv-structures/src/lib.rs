// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! The core crate for corticonv. Defines the anatomical data model shared by the
//! aggregation and architecture crates.
//!
//! - [`AreaId`]: cortical area identifier within a named parcellation scheme
//! - [`CorticalLayer`] / [`LayerSet`] / [`LaminarPattern`]: the fixed laminar vocabulary
//! - [`CorticalArea`]: surface extent, hierarchy level, per-layer neuron densities
//! - [`ConnectionRecord`]: directed inter-areal connection with FLNe and laminar pattern
//! - [`LayerPopulation`]: one modeled excitatory population per (area, layer)

mod error;
pub mod anatomy;

pub use anatomy::{
    AreaId, ConnectionRecord, CorticalArea, CorticalLayer, Flne, LaminarPattern, LayerPopulation,
    LayerSet, Parcellation,
};
pub use error::StructuresError;
