// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! Cortical surface mesh (`index,x,y,z` vertices and `v0,v1,v2` triangles)
//! and the per-area surface extent computed from it.

use super::{f64_cell, index_cell, read_table, VertexLabel};
use crate::types::AnatomyResult;
use corticonv_structures::AreaId;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

pub(crate) const VERTEX_COLUMNS: &[&str] = &["index", "x", "y", "z"];
pub(crate) const TRIANGLE_COLUMNS: &[&str] = &["v0", "v1", "v2"];

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceVertex {
    pub line: u64,
    pub index: usize,
    /// Position in mm
    pub position: [f64; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceTriangle {
    pub line: u64,
    pub vertices: [usize; 3],
}

pub fn read_surface_vertices(path: &Path, delimiter: u8) -> AnatomyResult<Vec<SurfaceVertex>> {
    read_table(path, delimiter, VERTEX_COLUMNS, |line, record| {
        Ok(SurfaceVertex {
            line,
            index: index_cell(record, 0, "index")?,
            position: [
                f64_cell(record, 1, "x")?,
                f64_cell(record, 2, "y")?,
                f64_cell(record, 3, "z")?,
            ],
        })
    })
}

pub fn read_surface_triangles(path: &Path, delimiter: u8) -> AnatomyResult<Vec<SurfaceTriangle>> {
    read_table(path, delimiter, TRIANGLE_COLUMNS, |line, record| {
        Ok(SurfaceTriangle {
            line,
            vertices: [
                index_cell(record, 0, "v0")?,
                index_cell(record, 1, "v1")?,
                index_cell(record, 2, "v2")?,
            ],
        })
    })
}

/// Area of a triangle from its corner positions
pub fn triangle_area(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let cross = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt()
}

/// Surface extent of every labelled area
///
/// Each triangle's area is attributed one third to the label of each of its
/// vertices. Unlabelled vertices (e.g. the medial wall) keep their share out
/// of every area. Triangles with unknown vertices are skipped; the validator
/// reports them. Every label appears in the result, possibly with `0.0`.
pub fn surface_extents(
    vertices: &[SurfaceVertex],
    triangles: &[SurfaceTriangle],
    labels: &[VertexLabel],
) -> BTreeMap<AreaId, f64> {
    let positions: HashMap<usize, [f64; 3]> =
        vertices.iter().map(|v| (v.index, v.position)).collect();
    let label_of: HashMap<usize, &AreaId> = labels.iter().map(|l| (l.vertex, &l.area)).collect();

    let mut extents: BTreeMap<AreaId, f64> =
        labels.iter().map(|l| (l.area.clone(), 0.0)).collect();

    for triangle in triangles {
        let [a, b, c] = triangle.vertices;
        let (Some(pa), Some(pb), Some(pc)) = (positions.get(&a), positions.get(&b), positions.get(&c))
        else {
            continue;
        };
        let share = triangle_area(*pa, *pb, *pc) / 3.0;
        for vertex in triangle.vertices {
            if let Some(area) = label_of.get(&vertex) {
                if let Some(extent) = extents.get_mut(*area) {
                    *extent += share;
                }
            }
        }
    }

    extents
}
