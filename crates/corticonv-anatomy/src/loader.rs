// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
High-level aggregation API.

`validate_datasets` is the validation entry point: it fails loudly when
required files are absent, malformed, or reference undefined areas, and never
drops data silently. `load_anatomy` runs it and builds the model.
*/

use crate::manifest::DatasetManifest;
use crate::model::AnatomicalModel;
use crate::signatures::generate_signatures;
use crate::sources::{read_sources, SourceTables};
use crate::types::{AnatomyError, AnatomyResult};
use crate::validator::{validate_sources, ValidationReport};
use corticonv_config::ValidationConfig;
use tracing::{error, info, warn};

/// Fail with every missing required file
pub fn check_inputs(manifest: &DatasetManifest) -> AnatomyResult<()> {
    let missing = manifest.missing_required();
    if missing.is_empty() {
        return Ok(());
    }
    for file in &missing {
        error!(
            "[LOADER] Missing required {} dataset: {}",
            file.kind,
            file.path.display()
        );
    }
    Err(AnatomyError::MissingInputs(
        missing.into_iter().map(|f| f.path).collect(),
    ))
}

/// Check files, read every dataset and cross-validate
///
/// Returns the report only when it has no errors; otherwise
/// `AnatomyError::ValidationFailed` carrying it.
pub fn validate_datasets(
    manifest: &DatasetManifest,
    config: &ValidationConfig,
) -> AnatomyResult<ValidationReport> {
    read_validated(manifest, config).map(|(_, report)| report)
}

/// Validate the datasets and build the anatomical model
pub fn load_anatomy(
    manifest: &DatasetManifest,
    config: &ValidationConfig,
) -> AnatomyResult<AnatomicalModel> {
    let (tables, _) = read_validated(manifest, config)?;
    let signatures = generate_signatures(manifest)?;
    info!("[LOADER] Dataset signature {}", signatures.combined);
    AnatomicalModel::from_sources(&tables, signatures)
}

fn read_validated(
    manifest: &DatasetManifest,
    config: &ValidationConfig,
) -> AnatomyResult<(SourceTables, ValidationReport)> {
    info!(
        "[LOADER] Validating {} datasets in {}",
        manifest.parcellation,
        manifest.data_dir.display()
    );
    check_inputs(manifest)?;

    let tables = read_sources(manifest)?;
    let report = validate_sources(&tables, config);

    for warning in &report.warnings {
        warn!("[VALIDATION] {}", warning);
    }
    if !report.valid {
        for problem in &report.errors {
            error!("[VALIDATION] {}", problem);
        }
        return Err(AnatomyError::ValidationFailed(report));
    }

    info!(
        "[LOADER] Datasets valid ({} warning(s))",
        report.warnings.len()
    );
    Ok((tables, report))
}
