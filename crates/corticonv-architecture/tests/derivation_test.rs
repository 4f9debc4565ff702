// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
Integration tests: anatomical model to network.
*/

mod common;

use corticonv_anatomy::{load_anatomy, AnatomicalModel, DatasetManifest};
use corticonv_architecture::{
    derive_architecture, get_stride_pattern, seeded_rng, ArchitectureError, StrideHints,
    StrideSearch, SystemBuilder,
};
use corticonv_config::{ArchitectureConfig, ValidationConfig};

fn fixture_model() -> (tempfile::TempDir, AnatomicalModel) {
    let dir = tempfile::tempdir().unwrap();
    common::write_dataset(dir.path());
    let manifest = DatasetManifest::from_config(&common::datasets_config(dir.path()));
    let model = load_anatomy(&manifest, &ValidationConfig::default()).expect("Failed to load dataset");
    (dir, model)
}

fn config() -> ArchitectureConfig {
    ArchitectureConfig {
        best_of: 10,
        seed: Some(42),
        ..Default::default()
    }
}

#[test]
fn test_system_from_model() {
    let (_dir, model) = fixture_model();
    let system = SystemBuilder::from_model(&model, &config()).unwrap();

    // input + 9 layer populations
    assert_eq!(system.len(), 10);
    // input, 5 intra-areal, 5 feedforward inter-areal
    assert_eq!(system.projections().len(), 11);

    assert!(system.find_projection_index("input", "V1_4").is_some());
    assert!(system.find_projection_index("V1_4", "V1_2/3").is_some());
    assert!(system.find_projection_index("V2_2/3", "V2_5").is_some());
    // laminar S -> F
    assert!(system.find_projection_index("V1_2/3", "V2_4").is_some());
    // no laminar data: default L2/3 -> L4
    assert!(system.find_projection_index("V1_2/3", "V4_4").is_some());
    // feedback and equal-level connections are left out
    assert!(system.find_projection_index("V4_2/3", "V2_4").is_none());
    assert!(system.find_projection_index("MT_2/3", "V4_4").is_none());

    assert!(system.topological_order().is_ok());
}

#[test]
fn test_min_flne_drops_weak_connections() {
    let (_dir, model) = fixture_model();
    let config = ArchitectureConfig {
        min_flne: 0.1,
        ..config()
    };
    let system = SystemBuilder::from_model(&model, &config).unwrap();
    // V1 -> V4 (0.05) and V2 -> MT (0.09) are dropped
    assert!(system.find_projection_index("V1_2/3", "V4_4").is_none());
    assert!(system.find_projection_index("V2_2/3", "MT_4").is_none());
    assert!(system.find_projection_index("V2_2/3", "V4_4").is_some());
}

#[test]
fn test_unknown_input_target() {
    let (_dir, model) = fixture_model();
    let config = ArchitectureConfig {
        input_targets: vec!["TEO_4".to_string()],
        ..config()
    };
    assert!(matches!(
        SystemBuilder::from_model(&model, &config),
        Err(ArchitectureError::UnknownPopulation(_))
    ));
}

#[test]
fn test_spine_count_hints() {
    let (_dir, model) = fixture_model();
    let config = config();
    let system = SystemBuilder::from_model(&model, &config).unwrap();
    let hints = StrideHints::from_model(&system, &model, &config).unwrap();

    let input = system.input_index().unwrap();
    assert_eq!(hints.channels[input], Some(3.0));
    assert!((hints.cumulative[input].unwrap() - 1.0).abs() < 1e-9);

    let v1 = system.find_population_index("V1_4").unwrap();
    assert_eq!(hints.channels[v1], Some(120.0));
    let v2 = system.find_population_index("V2_4").unwrap();
    assert_eq!(hints.channels[v2], Some((120.0_f64 * 1035.0 / 643.0).round()));
}

#[test]
fn test_stride_pattern_for_model() {
    let (_dir, model) = fixture_model();
    let config = config();
    let system = SystemBuilder::from_model(&model, &config).unwrap();
    let hints = StrideHints::from_model(&system, &model, &config).unwrap();
    let pattern = get_stride_pattern(
        &system,
        &StrideSearch::from_config(&config),
        &hints,
        &mut seeded_rng(7),
    )
    .unwrap();

    for (j, projection) in system.projections().iter().enumerate() {
        let stride = pattern.strides()[j].unwrap();
        let pre = pattern.cumulatives()[projection.origin].unwrap();
        let post = pattern.cumulatives()[projection.termination].unwrap();
        assert_eq!(post, pre * stride);
        assert!(post <= config.max_cumulative_stride);
    }
}

#[test]
fn test_derive_architecture_is_reproducible() {
    let (_dir, model) = fixture_model();
    let a = derive_architecture(&model, &config(), None).unwrap();
    let b = derive_architecture(&model, &config(), None).unwrap();

    assert_eq!(a.seed, 42);
    assert_eq!(a, b);
    assert_eq!(a.dataset_signature, model.signatures().combined);
    assert_eq!(a.network.layers.len(), 10);
    assert_eq!(a.network.find_layer("input").unwrap().channels, 3.0);
    assert!(a.network.layers.iter().all(|layer| layer.channels >= 1.0));

    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["network"]["connections"].as_array().unwrap().len(), 11);
}

#[test]
fn test_seed_argument_overrides_config() {
    let (_dir, model) = fixture_model();
    let derived = derive_architecture(&model, &config(), Some(7)).unwrap();
    assert_eq!(derived.seed, 7);
}
