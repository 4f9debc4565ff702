// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! Tract-tracing connectivity table (`source,target,flne`)

use super::{area_cell, f64_cell, read_table};
use crate::types::AnatomyResult;
use corticonv_structures::AreaId;
use std::path::Path;

pub(crate) const FLNE_COLUMNS: &[&str] = &["source", "target", "flne"];

/// One row of the FLNe table
#[derive(Debug, Clone, PartialEq)]
pub struct FlneRow {
    pub line: u64,
    pub source: AreaId,
    pub target: AreaId,
    /// Raw value; range is checked by the validator
    pub flne: f64,
}

pub fn read_flne_table(path: &Path, delimiter: u8) -> AnatomyResult<Vec<FlneRow>> {
    read_table(path, delimiter, FLNE_COLUMNS, |line, record| {
        Ok(FlneRow {
            line,
            source: area_cell(record, 0, "source")?,
            target: area_cell(record, 1, "target")?,
            flne: f64_cell(record, 2, "flne")?,
        })
    })
}
