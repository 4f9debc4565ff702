// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
Source dataset readers.

Each reader checks syntax only (column count, numbers, identifiers, laminar
codes) and fails with [`AnatomyError::Malformed`] on the first bad row.
Value ranges and cross-references are checked afterwards by the validator,
so that one run reports every inconsistency between datasets.

Delimited tables share one dialect: a single header row, `#` comment lines,
whitespace trimmed around every cell.
*/

mod connectivity_json;
mod flne;
mod laminar;
mod parcellation;
mod spine_counts;
mod surface;

pub use connectivity_json::{read_connectivity_json, AreaRecord, ConnectivityDataset};
pub use flne::{read_flne_table, FlneRow};
pub use laminar::{read_laminar_table, LaminarRow};
pub use parcellation::{read_parcellation, VertexLabel};
pub use spine_counts::{read_spine_counts, SpineCountRow};
pub use surface::{
    read_surface_triangles, read_surface_vertices, surface_extents, SurfaceTriangle,
    SurfaceVertex,
};

use crate::manifest::{DatasetKind, DatasetManifest};
use crate::types::{AnatomyError, AnatomyResult};
use corticonv_structures::AreaId;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Every parsed source dataset, before cross-validation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceTables {
    /// Parcellation scheme the datasets are expected to use
    pub parcellation_scheme: String,
    pub flne: Vec<FlneRow>,
    pub laminar: Vec<LaminarRow>,
    pub vertices: Vec<SurfaceVertex>,
    pub triangles: Vec<SurfaceTriangle>,
    pub labels: Vec<VertexLabel>,
    pub connectivity: ConnectivityDataset,
    pub spine_counts: Vec<SpineCountRow>,
}

/// Read every dataset listed in the manifest
///
/// A missing optional spine-count file yields an empty table.
pub fn read_sources(manifest: &DatasetManifest) -> AnatomyResult<SourceTables> {
    let delimiter = manifest.delimiter;
    let required = |kind: DatasetKind| {
        manifest
            .path(kind)
            .ok_or_else(|| AnatomyError::MissingInputs(vec![manifest.data_dir.join(kind.label())]))
    };

    let mut tables = SourceTables {
        parcellation_scheme: manifest.parcellation.clone(),
        flne: read_flne_table(required(DatasetKind::Flne)?, delimiter)?,
        laminar: read_laminar_table(required(DatasetKind::Laminar)?, delimiter)?,
        vertices: read_surface_vertices(required(DatasetKind::SurfaceVertices)?, delimiter)?,
        triangles: read_surface_triangles(required(DatasetKind::SurfaceTriangles)?, delimiter)?,
        labels: read_parcellation(required(DatasetKind::Parcellation)?, delimiter)?,
        connectivity: read_connectivity_json(required(DatasetKind::Connectivity)?)?,
        spine_counts: Vec::new(),
    };

    match manifest.path(DatasetKind::SpineCounts) {
        Some(path) if path.is_file() => {
            tables.spine_counts = read_spine_counts(path, delimiter)?;
        }
        Some(path) => info!(
            "[SOURCES] Optional spine-count file {} not found, channel hints from spine counts disabled",
            path.display()
        ),
        None => debug!("[SOURCES] Spine-count dataset disabled"),
    }

    info!(
        "[SOURCES] Read {} FLNe rows, {} laminar rows, {} vertices, {} triangles, {} labels, {} JSON areas, {} spine counts",
        tables.flne.len(),
        tables.laminar.len(),
        tables.vertices.len(),
        tables.triangles.len(),
        tables.labels.len(),
        tables.connectivity.areas.len(),
        tables.spine_counts.len()
    );

    Ok(tables)
}

/// Read a delimited table, converting every data record with `parse_row`
///
/// `parse_row` receives the 1-based file line of the record and its cells.
pub(crate) fn read_table<T, F>(
    path: &Path,
    delimiter: u8,
    columns: &[&str],
    mut parse_row: F,
) -> AnatomyResult<Vec<T>>
where
    F: FnMut(u64, &csv::StringRecord) -> Result<T, String>,
{
    let file = File::open(path).map_err(|source| AnatomyError::Io {
        file: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .has_headers(true)
        .flexible(false)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .clone();
    let header_line = headers.position().map(|p| p.line()).unwrap_or(1);
    let found: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    if found.len() != columns.len() || found.iter().zip(columns).any(|(f, c)| f.as_str() != *c) {
        return Err(AnatomyError::Malformed {
            file: path.to_path_buf(),
            line: header_line,
            reason: format!(
                "expected columns [{}], found [{}]",
                columns.join(", "),
                found.join(", ")
            ),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = parse_row(line, &record).map_err(|reason| AnatomyError::Malformed {
            file: path.to_path_buf(),
            line,
            reason,
        })?;
        rows.push(row);
    }

    debug!("[SOURCES] {}: {} rows", path.display(), rows.len());
    Ok(rows)
}

fn csv_error(path: &Path, error: csv::Error) -> AnatomyError {
    let line = error.position().map(|p| p.line()).unwrap_or(0);
    match error.into_kind() {
        csv::ErrorKind::Io(source) => AnatomyError::Io {
            file: path.to_path_buf(),
            source,
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => AnatomyError::Malformed {
            file: path.to_path_buf(),
            line,
            reason: format!("expected {} fields, found {}", expected_len, len),
        },
        csv::ErrorKind::Utf8 { err, .. } => AnatomyError::Malformed {
            file: path.to_path_buf(),
            line,
            reason: format!("invalid UTF-8: {}", err),
        },
        other => AnatomyError::Malformed {
            file: path.to_path_buf(),
            line,
            reason: format!("{:?}", other),
        },
    }
}

/// Cell accessors shared by the readers
pub(crate) fn cell<'r>(record: &'r csv::StringRecord, index: usize, column: &str) -> Result<&'r str, String> {
    record
        .get(index)
        .ok_or_else(|| format!("missing column '{}'", column))
}

pub(crate) fn area_cell(record: &csv::StringRecord, index: usize, column: &str) -> Result<AreaId, String> {
    let value = cell(record, index, column)?;
    AreaId::new(value).map_err(|e| format!("column '{}': {}", column, e))
}

pub(crate) fn f64_cell(record: &csv::StringRecord, index: usize, column: &str) -> Result<f64, String> {
    let value = cell(record, index, column)?;
    value
        .parse::<f64>()
        .map_err(|_| format!("column '{}': '{}' is not a number", column, value))
}

pub(crate) fn index_cell(record: &csv::StringRecord, index: usize, column: &str) -> Result<usize, String> {
    let value = cell(record, index, column)?;
    value
        .parse::<usize>()
        .map_err(|_| format!("column '{}': '{}' is not a vertex index", column, value))
}
