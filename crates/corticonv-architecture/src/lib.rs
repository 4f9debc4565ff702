/*!
# corticonv Architecture Derivation

Turns an [`corticonv_anatomy::AnatomicalModel`] into the hyperparameters of
a convolutional network:

- [`system`]: populations and feedforward projections as a DAG
- [`stride`]: integer stride patterns by randomized best-of search
- [`network`]: layer sizes and initial connection parameters
- [`pipeline`]: all of the above from one seed

```text
AnatomicalModel → System → StridePattern → Network
```

Copyright 2025 corticonv developers
Licensed under the Apache License, Version 2.0
*/

pub mod network;
pub mod pipeline;
pub mod rng;
pub mod stride;
pub mod system;
pub mod types;

pub use network::{image_resolution, initialize_network, Connection, Layer, Network};
pub use pipeline::{derive_architecture, DerivedArchitecture};
pub use rng::{resolve_seed, seeded_rng};
pub use stride::{get_stride_pattern, StrideHints, StridePattern, StrideSearch};
pub use system::{is_feedforward, Population, Projection, System, SystemBuilder};
pub use types::{ArchitectureError, ArchitectureResult};
