// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
Dataset manifest: the set of source files an aggregation run expects.
*/

use corticonv_config::DatasetsConfig;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Kind of source dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    Flne,
    Laminar,
    SurfaceVertices,
    SurfaceTriangles,
    Parcellation,
    Connectivity,
    SpineCounts,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 7] = [
        DatasetKind::Flne,
        DatasetKind::Laminar,
        DatasetKind::SurfaceVertices,
        DatasetKind::SurfaceTriangles,
        DatasetKind::Parcellation,
        DatasetKind::Connectivity,
        DatasetKind::SpineCounts,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Flne => "flne",
            DatasetKind::Laminar => "laminar",
            DatasetKind::SurfaceVertices => "surface_vertices",
            DatasetKind::SurfaceTriangles => "surface_triangles",
            DatasetKind::Parcellation => "parcellation",
            DatasetKind::Connectivity => "connectivity",
            DatasetKind::SpineCounts => "spine_counts",
        }
    }

    /// Spine counts are the only optional dataset
    pub fn is_required(&self) -> bool {
        !matches!(self, DatasetKind::SpineCounts)
    }
}

impl Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One expected source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    pub kind: DatasetKind,
    pub path: PathBuf,
}

impl DatasetFile {
    pub fn is_required(&self) -> bool {
        self.kind.is_required()
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Every expected source file, resolved against the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetManifest {
    pub data_dir: PathBuf,
    /// Parcellation scheme the datasets must agree on
    pub parcellation: String,
    pub delimiter: u8,
    pub files: Vec<DatasetFile>,
}

impl DatasetManifest {
    pub fn from_config(config: &DatasetsConfig) -> Self {
        let delimiter = config.delimiter_byte().unwrap_or_else(|| {
            warn!(
                "[MANIFEST] Delimiter {:?} is not a single ASCII character, using ','",
                config.delimiter
            );
            b','
        });

        let resolve = |name: &str| config.data_dir.join(name);
        let mut files = vec![
            DatasetFile {
                kind: DatasetKind::Flne,
                path: resolve(&config.flne_file),
            },
            DatasetFile {
                kind: DatasetKind::Laminar,
                path: resolve(&config.laminar_file),
            },
            DatasetFile {
                kind: DatasetKind::SurfaceVertices,
                path: resolve(&config.surface_vertices_file),
            },
            DatasetFile {
                kind: DatasetKind::SurfaceTriangles,
                path: resolve(&config.surface_triangles_file),
            },
            DatasetFile {
                kind: DatasetKind::Parcellation,
                path: resolve(&config.parcellation_file),
            },
            DatasetFile {
                kind: DatasetKind::Connectivity,
                path: resolve(&config.connectivity_file),
            },
        ];
        if let Some(spines) = config.spine_counts_name() {
            files.push(DatasetFile {
                kind: DatasetKind::SpineCounts,
                path: resolve(spines),
            });
        }

        Self {
            data_dir: config.data_dir.clone(),
            parcellation: config.parcellation.clone(),
            delimiter,
            files,
        }
    }

    /// Path of a dataset, if the manifest lists it
    pub fn path(&self, kind: DatasetKind) -> Option<&Path> {
        self.files
            .iter()
            .find(|f| f.kind == kind)
            .map(|f| f.path.as_path())
    }

    /// All required files absent on disk
    pub fn missing_required(&self) -> Vec<DatasetFile> {
        self.files
            .iter()
            .filter(|f| f.is_required() && !f.exists())
            .cloned()
            .collect()
    }
}
