// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
Seedable random number generation for corticonv-architecture.

Every random choice (stride sampling, connection parameters) draws from one
`StdRng`, so a run is reproduced exactly from its seed.
*/

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Use the configured seed, or draw a fresh one and log it
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => {
            let seed = rand::random::<u64>();
            info!("[RNG] No seed configured, using {}", seed);
            seed
        }
    }
}

/// Get a deterministic RNG instance for a seed
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
