//! Configuration validation
//!
//! This module provides validation logic to ensure configuration values are
//! consistent, within valid ranges, and don't conflict with each other.

use crate::{ConfigError, ConfigResult, CorticonvConfig};
use std::collections::HashMap;

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
    FileNameConflict { field1: String, field2: String, name: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
            Self::FileNameConflict {
                field1,
                field2,
                name,
            } => {
                write!(
                    f,
                    "File name conflict: {} and {} both name '{}'",
                    field1, field2, name
                )
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Required fields
/// - Dataset file name conflicts (two sources read from the same file)
/// - Valid value ranges
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &CorticonvConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(config, &mut errors);
    validate_file_names(config, &mut errors);
    validate_value_ranges(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_required_fields(config: &CorticonvConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.datasets.parcellation.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "datasets.parcellation".to_string(),
        });
    }

    for (field, name) in config.datasets.file_names() {
        if name.trim().is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: format!("datasets.{}", field),
            });
        }
    }

    if config.architecture.input_name.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "architecture.input_name".to_string(),
        });
    }

    if config.architecture.input_targets.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "architecture.input_targets".to_string(),
        });
    }

    if config.architecture.reference_area.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "architecture.reference_area".to_string(),
        });
    }
}

/// Two sources must not be read from the same file
fn validate_file_names(config: &CorticonvConfig, errors: &mut Vec<ConfigValidationError>) {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (field, name) in config.datasets.file_names() {
        if name.trim().is_empty() {
            continue;
        }
        if let Some(previous) = seen.insert(name, field) {
            errors.push(ConfigValidationError::FileNameConflict {
                field1: format!("datasets.{}", previous),
                field2: format!("datasets.{}", field),
                name: name.to_string(),
            });
        }
    }
}

fn validate_value_ranges(config: &CorticonvConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.datasets.delimiter_byte().is_none() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "datasets.delimiter".to_string(),
            reason: format!(
                "must be a single ASCII character, got {:?}",
                config.datasets.delimiter
            ),
        });
    }

    let validation = &config.validation;
    if !(validation.max_flne.is_finite() && validation.max_flne > 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "validation.max_flne".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if !(validation.flne_sum_tolerance.is_finite() && validation.flne_sum_tolerance >= 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "validation.flne_sum_tolerance".to_string(),
            reason: "must be non-negative".to_string(),
        });
    }

    let arch = &config.architecture;
    if !(arch.input_neurons.is_finite() && arch.input_neurons > 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "architecture.input_neurons".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if !(arch.image_channels.is_finite() && arch.image_channels > 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "architecture.image_channels".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if !(arch.reference_channels.is_finite() && arch.reference_channels > 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "architecture.reference_channels".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    for (name, channels) in &arch.channel_overrides {
        if !(channels.is_finite() && *channels > 0.0) {
            errors.push(ConfigValidationError::InvalidValue {
                field: format!("architecture.channel_overrides.{}", name),
                reason: "must be positive".to_string(),
            });
        }
    }
    if !(arch.min_flne.is_finite() && arch.min_flne >= 0.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "architecture.min_flne".to_string(),
            reason: "must be non-negative".to_string(),
        });
    }
    if arch.min_stride == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "architecture.min_stride".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if arch.max_cumulative_stride < arch.min_stride.max(1) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "architecture.max_cumulative_stride".to_string(),
            reason: "must be at least min_stride".to_string(),
        });
    }
    if arch.best_of == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "architecture.best_of".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if arch.max_attempts == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "architecture.max_attempts".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    if arch.kernel_width == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "architecture.kernel_width".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.trim().to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {:?}", LOG_LEVELS),
        });
    }
}

/// Accepted `logging.level` values, case-insensitive (`warning` is an alias of `warn`)
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "warning", "error"];
