// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
Architecture Derivation Tool

Validates the anatomical datasets, builds the population system, picks the
best integer stride pattern and writes the initialized network as JSON.

Usage:
  cargo run --bin corticonv-derive -- --data-dir data/macaque --seed 7 --output network.json

Copyright 2025 corticonv developers
Licensed under the Apache License, Version 2.0
*/

use anyhow::{Context, Result};
use clap::Parser;
use corticonv::anatomy::{load_anatomy, DatasetManifest};
use corticonv::architecture::derive_architecture;
use corticonv::config::validate_config;
use corticonv::observability::{debug_flags_help, init_logging, parse_debug_flags, strip_debug_args};
use corticonv::{load_run_config, logging_settings};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Derive network hyperparameters from anatomical datasets
#[derive(Parser, Debug)]
#[command(name = "corticonv-derive", version, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Configuration file (default: search for corticonv_configuration.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the dataset files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// RNG seed (default: configured seed, else random)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of candidate stride patterns
    #[arg(long)]
    best_of: Option<usize>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also print a human-readable summary to stderr
    #[arg(long, default_value_t = false)]
    summary: bool,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let debug_flags = parse_debug_flags();
    let args = Args::parse_from(strip_debug_args(std::env::args()));

    let mut overrides = HashMap::new();
    if let Some(dir) = &args.data_dir {
        overrides.insert("data_dir".to_string(), dir.display().to_string());
    }
    if let Some(best_of) = args.best_of {
        overrides.insert("best_of".to_string(), best_of.to_string());
    }
    if args.verbose {
        overrides.insert("log_level".to_string(), "debug".to_string());
    }

    let (config, config_file) =
        load_run_config(args.config.as_deref(), &overrides).context("Failed to load configuration")?;
    let _logging = init_logging(&logging_settings(&config.logging), &debug_flags)
        .context("Failed to initialize logging")?;
    if let Some(file) = &config_file {
        info!("[CONFIG] Loaded {}", file.display());
    }
    validate_config(&config).context("Invalid configuration")?;

    let manifest = DatasetManifest::from_config(&config.datasets);
    let model = load_anatomy(&manifest, &config.validation).with_context(|| {
        format!(
            "Failed to load anatomical datasets from {}",
            manifest.data_dir.display()
        )
    })?;

    let derived = derive_architecture(&model, &config.architecture, args.seed)
        .context("Failed to derive architecture")?;
    if args.summary {
        eprintln!("{}", derived.network.summary());
    }

    let json = serde_json::to_string_pretty(&derived).context("Failed to serialize network")?;
    match &args.output {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("[DERIVE] Wrote {} (seed {})", path.display(), derived.seed);
        }
        None => println!("{}", json),
    }
    Ok(())
}
