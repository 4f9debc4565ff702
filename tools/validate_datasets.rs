// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
Dataset Validation Tool

Checks that every anatomical source file is present and well-formed and that
the datasets agree with each other, then prints the validation report.

Usage:
  cargo run --bin corticonv-validate -- --data-dir data/macaque --strict

Exit code 0 when the datasets are valid, 1 otherwise.

Copyright 2025 corticonv developers
Licensed under the Apache License, Version 2.0
*/

use anyhow::{Context, Result};
use clap::Parser;
use corticonv::anatomy::{validate_datasets, AnatomyError, DatasetManifest};
use corticonv::config::validate_config;
use corticonv::observability::{debug_flags_help, init_logging, parse_debug_flags, strip_debug_args};
use corticonv::{load_run_config, logging_settings};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Validate anatomical source datasets
#[derive(Parser, Debug)]
#[command(name = "corticonv-validate", version, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Configuration file (default: search for corticonv_configuration.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the dataset files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<bool> {
    let debug_flags = parse_debug_flags();
    let args = Args::parse_from(strip_debug_args(std::env::args()));

    let mut overrides = HashMap::new();
    if let Some(dir) = &args.data_dir {
        overrides.insert("data_dir".to_string(), dir.display().to_string());
    }
    if args.strict {
        overrides.insert("strict".to_string(), "true".to_string());
    }
    if args.verbose {
        overrides.insert("log_level".to_string(), "debug".to_string());
    }

    let (config, config_file) =
        load_run_config(args.config.as_deref(), &overrides).context("Failed to load configuration")?;
    let _logging = init_logging(&logging_settings(&config.logging), &debug_flags)
        .context("Failed to initialize logging")?;
    match &config_file {
        Some(file) => info!("[CONFIG] Loaded {}", file.display()),
        None => info!("[CONFIG] No configuration file found, using defaults"),
    }
    validate_config(&config).context("Invalid configuration")?;

    let manifest = DatasetManifest::from_config(&config.datasets);
    println!("Datasets: {}", manifest.data_dir.display());
    for file in &manifest.files {
        let status = if file.exists() {
            "found"
        } else if file.is_required() {
            "MISSING"
        } else {
            "absent (optional)"
        };
        println!("  {:<24} {} [{}]", file.kind.label(), file.path.display(), status);
    }
    println!();

    match validate_datasets(&manifest, &config.validation) {
        Ok(report) => {
            println!("{}", report);
            println!("Datasets are valid");
            Ok(true)
        }
        Err(AnatomyError::ValidationFailed(report)) => {
            println!("{}", report);
            error!("[VALIDATION] {} error(s)", report.errors.len());
            Ok(false)
        }
        Err(AnatomyError::MissingInputs(paths)) => {
            for path in &paths {
                println!("Missing required file: {}", path.display());
            }
            error!("[VALIDATION] {} required file(s) missing", paths.len());
            Ok(false)
        }
        Err(e) => {
            println!("Dataset error: {}", e);
            error!("[VALIDATION] {}", e);
            Ok(false)
        }
    }
}
