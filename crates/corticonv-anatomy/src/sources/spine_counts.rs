// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! Optional per-area spine counts (`area,spine_count`)

use super::{area_cell, f64_cell, read_table};
use crate::types::AnatomyResult;
use corticonv_structures::AreaId;
use std::path::Path;

pub(crate) const SPINE_COLUMNS: &[&str] = &["area", "spine_count"];

#[derive(Debug, Clone, PartialEq)]
pub struct SpineCountRow {
    pub line: u64,
    pub area: AreaId,
    pub spine_count: f64,
}

pub fn read_spine_counts(path: &Path, delimiter: u8) -> AnatomyResult<Vec<SpineCountRow>> {
    read_table(path, delimiter, SPINE_COLUMNS, |line, record| {
        Ok(SpineCountRow {
            line,
            area: area_cell(record, 0, "area")?,
            spine_count: f64_cell(record, 1, "spine_count")?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::write_table;

    #[test]
    fn test_read_spine_counts() {
        let (_dir, path) = write_table(
            "spine_counts.csv",
            "area,spine_count\n# Elston 2007\nV1,643\nV2,1035\n",
        );
        let rows = read_spine_counts(&path, b',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].spine_count, 643.0);
    }
}
