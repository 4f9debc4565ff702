// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `corticonv_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CorticonvConfig {
    pub datasets: DatasetsConfig,
    pub validation: ValidationConfig,
    pub architecture: ArchitectureConfig,
    pub logging: LoggingConfig,
}

/// Location and format of the anatomical source files
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetsConfig {
    /// Directory the file names below are resolved against
    pub data_dir: PathBuf,
    /// Parcellation scheme the area identifiers belong to
    pub parcellation: String,
    /// Field delimiter of the delimited text files (one ASCII character)
    pub delimiter: String,
    pub flne_file: String,
    pub laminar_file: String,
    pub surface_vertices_file: String,
    pub surface_triangles_file: String,
    pub parcellation_file: String,
    pub connectivity_file: String,
    /// Optional spine-count table; an empty name disables it
    pub spine_counts_file: Option<String>,
}

impl Default for DatasetsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            parcellation: "FV91".to_string(),
            delimiter: ",".to_string(),
            flne_file: "flne.csv".to_string(),
            laminar_file: "laminar.csv".to_string(),
            surface_vertices_file: "surface_vertices.csv".to_string(),
            surface_triangles_file: "surface_triangles.csv".to_string(),
            parcellation_file: "parcellation.csv".to_string(),
            connectivity_file: "connectivity.json".to_string(),
            spine_counts_file: Some("spine_counts.csv".to_string()),
        }
    }
}

impl DatasetsConfig {
    /// Delimiter as a single byte; `None` if the configured value is not one ASCII character
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Some(*b),
            _ => None,
        }
    }

    /// Every configured file name, in manifest order
    pub fn file_names(&self) -> Vec<(&'static str, &str)> {
        let mut names = vec![
            ("flne_file", self.flne_file.as_str()),
            ("laminar_file", self.laminar_file.as_str()),
            ("surface_vertices_file", self.surface_vertices_file.as_str()),
            ("surface_triangles_file", self.surface_triangles_file.as_str()),
            ("parcellation_file", self.parcellation_file.as_str()),
            ("connectivity_file", self.connectivity_file.as_str()),
        ];
        if let Some(spines) = self.spine_counts_name() {
            names.push(("spine_counts_file", spines));
        }
        names
    }

    /// Spine-count file name, unless disabled
    pub fn spine_counts_name(&self) -> Option<&str> {
        self.spine_counts_file
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Cross-dataset validation thresholds
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Largest accepted FLNe value
    pub max_flne: f64,
    /// Allowed excess of the per-target FLNe sum over 1.0 before warning
    pub flne_sum_tolerance: f64,
    /// Treat warnings as errors
    pub strict: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_flne: 1.0,
            flne_sum_tolerance: 0.05,
            strict: false,
        }
    }
}

/// Architecture derivation (system building, stride search, network initialization)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ArchitectureConfig {
    /// Name of the image input population
    pub input_name: String,
    /// Neurons in the input population (pixels² × channels)
    pub input_neurons: f64,
    /// Populations the input projects to
    pub input_targets: Vec<String>,
    pub image_channels: f64,
    /// Area whose channel count anchors the spine-count channel hints
    pub reference_area: String,
    pub reference_channels: f64,
    /// Fixed channel counts by population name
    pub channel_overrides: BTreeMap<String, f64>,
    /// Connections with a smaller FLNe are not turned into projections
    pub min_flne: f64,
    /// Add L4 -> L2/3 -> L5 projections inside each area
    pub intra_areal: bool,
    pub max_cumulative_stride: u32,
    pub min_stride: u32,
    /// Number of candidate stride patterns to compare
    pub best_of: usize,
    /// Random attempts per path before stride initialization fails
    pub max_attempts: usize,
    pub kernel_width: u32,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for ArchitectureConfig {
    fn default() -> Self {
        Self {
            input_name: "input".to_string(),
            input_neurons: 3.0 * 224.0 * 224.0,
            input_targets: vec!["V1_4".to_string()],
            image_channels: 3.0,
            reference_area: "V1".to_string(),
            reference_channels: 120.0,
            channel_overrides: BTreeMap::new(),
            min_flne: 0.0,
            intra_areal: true,
            max_cumulative_stride: 32,
            min_stride: 1,
            best_of: 50,
            max_attempts: 10_000,
            kernel_width: 7,
            seed: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Also write per-run JSON log files
    pub file_logging: bool,
    pub log_dir: PathBuf,
    pub retention_days: u64,
    pub retention_runs: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
            log_dir: PathBuf::from("./logs"),
            retention_days: 30,
            retention_runs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: CorticonvConfig = toml::from_str(
            r#"
            [datasets]
            parcellation = "M132"
            spine_counts_file = "elston.tsv"

            [architecture.channel_overrides]
            LGNparvo = 4.0
            "#,
        )
        .unwrap();
        assert_eq!(config.datasets.parcellation, "M132");
        assert_eq!(config.datasets.flne_file, "flne.csv");
        assert_eq!(config.datasets.spine_counts_file.as_deref(), Some("elston.tsv"));
        assert_eq!(config.architecture.channel_overrides["LGNparvo"], 4.0);
        assert_eq!(config.architecture.best_of, 50);
    }

    #[test]
    fn test_delimiter_byte() {
        let mut datasets = DatasetsConfig::default();
        assert_eq!(datasets.delimiter_byte(), Some(b','));
        datasets.delimiter = "\t".to_string();
        assert_eq!(datasets.delimiter_byte(), Some(b'\t'));
        datasets.delimiter = ";;".to_string();
        assert_eq!(datasets.delimiter_byte(), None);
    }
}
