// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! Laminar origin/termination table (`source,target,origin,termination`)

use super::{area_cell, cell, read_table};
use crate::types::AnatomyResult;
use corticonv_structures::{AreaId, LaminarPattern};
use std::path::Path;

pub(crate) const LAMINAR_COLUMNS: &[&str] = &["source", "target", "origin", "termination"];

#[derive(Debug, Clone, PartialEq)]
pub struct LaminarRow {
    pub line: u64,
    pub source: AreaId,
    pub target: AreaId,
    /// `None` when both cells are empty
    pub pattern: Option<LaminarPattern>,
}

pub fn read_laminar_table(path: &Path, delimiter: u8) -> AnatomyResult<Vec<LaminarRow>> {
    read_table(path, delimiter, LAMINAR_COLUMNS, |line, record| {
        let origin = cell(record, 2, "origin")?;
        let termination = cell(record, 3, "termination")?;
        let pattern = LaminarPattern::parse(origin, termination).map_err(|e| e.to_string())?;
        Ok(LaminarRow {
            line,
            source: area_cell(record, 0, "source")?,
            target: area_cell(record, 1, "target")?,
            pattern,
        })
    })
}
