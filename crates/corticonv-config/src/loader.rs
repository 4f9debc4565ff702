// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, CorticonvConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the corticonv configuration file
///
/// Search order:
/// 1. `CORTICONV_CONFIG_PATH` environment variable
/// 2. Current working directory: `./corticonv_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("CORTICONV_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by CORTICONV_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "corticonv configuration file '{}' not found in any of these locations:\n{}\n\nSet CORTICONV_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Value validation is separate, see [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<CorticonvConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: CorticonvConfig = toml::from_str(&content)?;

    // Relative data directories are relative to the config file, not the cwd
    if config.datasets.data_dir.is_relative() {
        if let Some(parent) = config_file.parent() {
            config.datasets.data_dir = parent.join(&config.datasets.data_dir);
        }
    }

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `CORTICONV_DATA_DIR` -> `datasets.data_dir`
/// - `CORTICONV_PARCELLATION` -> `datasets.parcellation`
/// - `CORTICONV_STRICT` -> `validation.strict`
/// - `CORTICONV_SEED` -> `architecture.seed`
/// - `CORTICONV_BEST_OF` -> `architecture.best_of`
/// - `CORTICONV_MAX_CUMULATIVE_STRIDE` -> `architecture.max_cumulative_stride`
/// - `CORTICONV_LOG_LEVEL` -> `logging.level`
/// - `CORTICONV_LOG_DIR` -> `logging.log_dir`
pub fn apply_environment_overrides(config: &mut CorticonvConfig) {
    if let Ok(value) = env::var("CORTICONV_DATA_DIR") {
        config.datasets.data_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("CORTICONV_PARCELLATION") {
        config.datasets.parcellation = value;
    }

    if let Ok(value) = env::var("CORTICONV_STRICT") {
        config.validation.strict = parse_flag(&value);
    }

    if let Ok(value) = env::var("CORTICONV_SEED") {
        if let Ok(seed) = value.parse::<u64>() {
            config.architecture.seed = Some(seed);
        }
    }
    if let Ok(value) = env::var("CORTICONV_BEST_OF") {
        if let Ok(best_of) = value.parse::<usize>() {
            config.architecture.best_of = best_of;
        }
    }
    if let Ok(value) = env::var("CORTICONV_MAX_CUMULATIVE_STRIDE") {
        if let Ok(stride) = value.parse::<u32>() {
            config.architecture.max_cumulative_stride = stride;
        }
    }

    if let Ok(value) = env::var("CORTICONV_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("CORTICONV_LOG_DIR") {
        config.logging.log_dir = PathBuf::from(value);
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"data_dir": "/data/macaque", "seed": "7"}`)
pub fn apply_cli_overrides(config: &mut CorticonvConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("data_dir") {
        config.datasets.data_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("parcellation") {
        config.datasets.parcellation = value.clone();
    }
    if let Some(value) = cli_args.get("delimiter") {
        config.datasets.delimiter = value.clone();
    }

    if let Some(value) = cli_args.get("strict") {
        config.validation.strict = parse_flag(value);
    }

    if let Some(value) = cli_args.get("seed") {
        if let Ok(seed) = value.parse::<u64>() {
            config.architecture.seed = Some(seed);
        }
    }
    if let Some(value) = cli_args.get("best_of") {
        if let Ok(best_of) = value.parse::<usize>() {
            config.architecture.best_of = best_of;
        }
    }
    if let Some(value) = cli_args.get("max_cumulative_stride") {
        if let Ok(stride) = value.parse::<u32>() {
            config.architecture.max_cumulative_stride = stride;
        }
    }

    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("CORTICONV_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("CORTICONV_CONFIG_PATH");

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("absent.toml");

        env::set_var("CORTICONV_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("CORTICONV_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::remove_var("CORTICONV_DATA_DIR");
        env::remove_var("CORTICONV_BEST_OF");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[datasets]").unwrap();
        writeln!(file, "data_dir = \"macaque\"").unwrap();
        writeln!(file, "[architecture]").unwrap();
        writeln!(file, "best_of = 5").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.architecture.best_of, 5);
        assert_eq!(config.datasets.data_dir, dir.path().join("macaque"));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&config_path, "[datasets\nflne_file = 3").unwrap();

        let result = load_config(Some(&config_path), None);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = CorticonvConfig::default();

        env::set_var("CORTICONV_SEED", "42");
        env::set_var("CORTICONV_STRICT", "yes");
        env::set_var("CORTICONV_BEST_OF", "not-a-number");

        apply_environment_overrides(&mut config);

        env::remove_var("CORTICONV_SEED");
        env::remove_var("CORTICONV_STRICT");
        env::remove_var("CORTICONV_BEST_OF");

        assert_eq!(config.architecture.seed, Some(42));
        assert!(config.validation.strict);
        // Unparseable values leave the field untouched
        assert_eq!(config.architecture.best_of, 50);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = CorticonvConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("data_dir".to_string(), "/srv/anatomy".to_string());
        cli_args.insert("max_cumulative_stride".to_string(), "16".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.datasets.data_dir, PathBuf::from("/srv/anatomy"));
        assert_eq!(config.architecture.max_cumulative_stride, 16);
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        // CLI overrides take precedence over environment variables
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[architecture]").unwrap();
        writeln!(file, "seed = 1").unwrap();
        writeln!(file, "best_of = 10").unwrap();

        env::set_var("CORTICONV_SEED", "2");
        env::set_var("CORTICONV_BEST_OF", "20");

        let mut cli_args = HashMap::new();
        cli_args.insert("seed".to_string(), "3".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("CORTICONV_SEED");
        env::remove_var("CORTICONV_BEST_OF");

        // CLI wins for seed, env wins for best_of (no CLI override)
        assert_eq!(config.architecture.seed, Some(3));
        assert_eq!(config.architecture.best_of, 20);
    }
}
