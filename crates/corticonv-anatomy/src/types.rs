/*!
Core types and error handling for anatomical data aggregation.

Copyright 2025 corticonv developers
Licensed under the Apache License, Version 2.0
*/

use crate::validator::ValidationReport;
use corticonv_structures::StructuresError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for aggregation operations
pub type AnatomyResult<T> = Result<T, AnatomyError>;

/// Error types for aggregation operations
#[derive(Error, Debug)]
pub enum AnatomyError {
    #[error("Missing required input files: {}", display_paths(.0))]
    MissingInputs(Vec<PathBuf>),

    #[error("I/O error reading {}: {source}", .file.display())]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {} (line {line}): {reason}", .file.display())]
    Malformed {
        file: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Invalid JSON dataset {}: {reason}", .file.display())]
    Json { file: PathBuf, reason: String },

    #[error("Dataset validation failed with {} error(s)", .0.errors.len())]
    ValidationFailed(ValidationReport),

    #[error("Invalid anatomical data: {0}")]
    Structures(#[from] StructuresError),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_inputs_lists_every_file() {
        let err = AnatomyError::MissingInputs(vec![
            PathBuf::from("data/flne.csv"),
            PathBuf::from("data/laminar.csv"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("data/flne.csv"));
        assert!(msg.contains("data/laminar.csv"));
    }
}
