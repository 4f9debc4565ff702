/*!
# corticonv Anatomical Data Aggregation

Ingests independently-sourced anatomical datasets and combines them into one
consistent, read-only [`AnatomicalModel`]:

- tract-tracing connectivity (FLNe) and laminar projection patterns
- cortical surface mesh with a vertex parcellation (surface extents)
- per-layer neuron densities and hierarchy levels (JSON dataset)
- optional per-area spine counts

## Pipeline

```text
DatasetManifest → check_inputs → read_sources → validate_sources → AnatomicalModel
   (paths)        (all missing)   (syntax)       (cross-refs)        (read-only)
```

The architecture crate turns the model into a network description.

Copyright 2025 corticonv developers
Licensed under the Apache License, Version 2.0
*/

pub mod loader;
pub mod manifest;
pub mod model;
pub mod signatures;
pub mod sources;
pub mod types;
pub mod validator;

pub use loader::{check_inputs, load_anatomy, validate_datasets};
pub use manifest::{DatasetFile, DatasetKind, DatasetManifest};
pub use model::AnatomicalModel;
pub use signatures::{generate_signatures, DatasetSignatures};
pub use sources::{read_sources, surface_extents, SourceTables};
pub use types::{AnatomyError, AnatomyResult};
pub use validator::{validate_sources, ValidationReport};
