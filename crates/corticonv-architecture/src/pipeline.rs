// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! Model → system → stride pattern → network, in one call.

use crate::network::{initialize_network, Network};
use crate::rng::{resolve_seed, seeded_rng};
use crate::stride::{cumulatives_by_name, get_stride_pattern, StrideHints, StrideSearch};
use crate::system::SystemBuilder;
use crate::types::ArchitectureResult;
use corticonv_anatomy::AnatomicalModel;
use corticonv_config::ArchitectureConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Output artifact of a derivation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedArchitecture {
    /// Seed that reproduces this run
    pub seed: u64,
    /// Combined signature of the datasets the model was built from
    pub dataset_signature: String,
    pub distance_from_hints: f64,
    pub cumulative_strides: BTreeMap<String, Option<u32>>,
    pub network: Network,
}

/// Derive a network from the anatomical model
///
/// `seed` overrides `config.seed`; with neither, a fresh seed is drawn and
/// recorded in the result.
pub fn derive_architecture(
    model: &AnatomicalModel,
    config: &ArchitectureConfig,
    seed: Option<u64>,
) -> ArchitectureResult<DerivedArchitecture> {
    let seed = resolve_seed(seed.or(config.seed));
    let mut rng = seeded_rng(seed);

    let system = SystemBuilder::from_model(model, config)?;
    let hints = StrideHints::from_model(&system, model, config)?;
    let search = StrideSearch::from_config(config);
    let pattern = get_stride_pattern(&system, &search, &hints, &mut rng)?;
    let network = initialize_network(
        &system,
        &pattern,
        config.image_channels,
        config.kernel_width,
        &mut rng,
    )?;

    info!(
        "[DERIVE] Derived {} layers from {} areas (seed {})",
        network.layers.len(),
        model.area_count(),
        seed
    );
    Ok(DerivedArchitecture {
        seed,
        dataset_signature: model.signatures().combined.clone(),
        distance_from_hints: pattern.distance_from_hints(),
        cumulative_strides: cumulatives_by_name(&system, &pattern),
        network,
    })
}
