//! # corticonv - cortical anatomy to convolutional-network hyperparameters
//!
//! corticonv aggregates independently-sourced primate cortical anatomy
//! (tract-tracing FLNe, laminar projection patterns, surface meshes with a
//! parcellation, per-layer neuron densities, spine counts) into one
//! validated model, and derives the hyperparameters of a convolutional
//! network from it: channels, feature-map sizes and integer strides.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! corticonv = "0.1"  # Default: aggregation + architecture derivation
//! ```
//!
//! ## Feature Flags
//!
//! - **`architecture`** (default): system builder, stride search, network
//!   initialization. Without it only the anatomical aggregation is built.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use corticonv::prelude::*;
//!
//! let config = load_config(None, None)?;
//! validate_config(&config)?;
//!
//! let manifest = DatasetManifest::from_config(&config.datasets);
//! let model = load_anatomy(&manifest, &config.validation)?;
//!
//! let derived = derive_architecture(&model, &config.architecture, Some(42))?;
//! println!("{}", derived.network.summary());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: corticonv-structures, corticonv-config     │
//! │  (AreaId, ConnectionRecord, LayerPopulation, TOML)      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Aggregation: corticonv-anatomy                         │
//! │  (readers, cross-validation, AnatomicalModel)           │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Derivation: corticonv-architecture                     │
//! │  (System, StridePattern, Network)                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Logging for all layers goes through `corticonv-observability`.
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use corticonv_config as config;
pub use corticonv_structures as structures;

// Re-export infrastructure
pub use corticonv_observability as observability;

// Re-export aggregation
pub use corticonv_anatomy as anatomy;

// Re-export derivation
#[cfg(feature = "architecture")]
pub use corticonv_architecture as architecture;

use corticonv_config::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config, ConfigError,
    ConfigResult, CorticonvConfig, LoggingConfig,
};
use corticonv_observability::{FileLogging, LoggingSettings};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Load the configuration for a tool run
///
/// An explicit `path` must exist. Without one the usual search applies, and
/// when no file is found the defaults are used, still with environment and
/// CLI overrides. Returns the file that was read, if any.
pub fn load_run_config(
    path: Option<&Path>,
    overrides: &HashMap<String, String>,
) -> ConfigResult<(CorticonvConfig, Option<PathBuf>)> {
    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => match find_config_file() {
            Ok(found) => Some(found),
            Err(ConfigError::FileNotFound(_)) => None,
            Err(e) => return Err(e),
        },
    };

    match file {
        Some(file) => Ok((load_config(Some(&file), Some(overrides))?, Some(file))),
        None => {
            let mut config = CorticonvConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, overrides);
            Ok((config, None))
        }
    }
}

/// Logging settings for the `[logging]` configuration section
pub fn logging_settings(config: &LoggingConfig) -> LoggingSettings {
    let settings = LoggingSettings::console(config.level.clone());
    if !config.file_logging {
        return settings;
    }
    settings.with_file_logging(FileLogging {
        log_dir: config.log_dir.clone(),
        retention_days: config.retention_days,
        retention_runs: config.retention_runs,
    })
}

/// Prelude - commonly used types and functions
pub mod prelude {
    pub use crate::structures::{
        AreaId, ConnectionRecord, CorticalArea, CorticalLayer, Flne, LaminarPattern,
        LayerPopulation, LayerSet, Parcellation,
    };

    pub use crate::config::{load_config, validate_config, CorticonvConfig};

    pub use crate::anatomy::{
        load_anatomy, validate_datasets, AnatomicalModel, AnatomyError, DatasetManifest,
        ValidationReport,
    };

    #[cfg(feature = "architecture")]
    pub use crate::architecture::{
        derive_architecture, get_stride_pattern, initialize_network, ArchitectureError,
        DerivedArchitecture, Network, StrideHints, StridePattern, StrideSearch, System,
        SystemBuilder,
    };
}
