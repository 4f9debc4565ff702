/*!
Core types and error handling for architecture derivation.

Copyright 2025 corticonv developers
Licensed under the Apache License, Version 2.0
*/

use corticonv_structures::StructuresError;

/// Result type for derivation operations
pub type ArchitectureResult<T> = Result<T, ArchitectureError>;

/// Errors that can occur while deriving an architecture
#[derive(Debug, thiserror::Error)]
pub enum ArchitectureError {
    #[error("Unknown population: {0}")]
    UnknownPopulation(String),

    #[error("Duplicate population: {0}")]
    DuplicatePopulation(String),

    #[error("Duplicate projection: {origin} -> {termination}")]
    DuplicateProjection { origin: String, termination: String },

    #[error("System already has input population {0}")]
    DuplicateInput(String),

    #[error("System has no input population")]
    MissingInput,

    #[error("Projections form a cycle through {0}")]
    Cycle(String),

    #[error("System has no populations besides the input")]
    EmptySystem,

    #[error("Stride initialization failed along {path}: {reason}")]
    StrideInitialization { path: String, reason: String },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid anatomical data: {0}")]
    Structures(#[from] StructuresError),
}
