// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! Vertex → area label file (`vertex,area`)

use super::{area_cell, index_cell, read_table};
use crate::types::AnatomyResult;
use corticonv_structures::AreaId;
use std::path::Path;

pub(crate) const LABEL_COLUMNS: &[&str] = &["vertex", "area"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLabel {
    pub line: u64,
    pub vertex: usize,
    pub area: AreaId,
}

pub fn read_parcellation(path: &Path, delimiter: u8) -> AnatomyResult<Vec<VertexLabel>> {
    read_table(path, delimiter, LABEL_COLUMNS, |line, record| {
        Ok(VertexLabel {
            line,
            vertex: index_cell(record, 0, "vertex")?,
            area: area_cell(record, 1, "area")?,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::write_table;

    #[test]
    fn test_read_labels() {
        let (_dir, path) = write_table("parcellation.csv", "vertex,area\n0,V1\n1,V2\n");
        let labels = read_parcellation(&path, b',').unwrap();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].area.as_str(), "V2");
    }
}
