// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! Small macaque-like dataset written to a temp directory.
//!
//! Four areas on disjoint square patches of the mesh (side 20, 18, 12 and
//! 8 mm), so the surface extent of each area is the square of its side.

#![allow(dead_code)]

use corticonv_config::DatasetsConfig;
use serde_json::json;
use std::path::Path;

pub const AREAS: [(&str, f64); 4] = [("V1", 20.0), ("V2", 18.0), ("V4", 12.0), ("MT", 8.0)];

pub fn write_dataset(dir: &Path) {
    let mut vertices = String::from("index,x,y,z\n");
    let mut triangles = String::from("v0,v1,v2\n");
    let mut labels = String::from("vertex,area\n");
    for (k, (area, side)) in AREAS.iter().enumerate() {
        let x0 = 100.0 * k as f64;
        let base = 4 * k;
        for (i, (dx, dy)) in [(0.0, 0.0), (*side, 0.0), (*side, *side), (0.0, *side)]
            .iter()
            .enumerate()
        {
            vertices.push_str(&format!("{},{},{},0\n", base + i, x0 + dx, dy));
            labels.push_str(&format!("{},{}\n", base + i, area));
        }
        triangles.push_str(&format!("{},{},{}\n", base, base + 1, base + 2));
        triangles.push_str(&format!("{},{},{}\n", base, base + 2, base + 3));
    }

    write(dir, "surface_vertices.csv", &vertices);
    write(dir, "surface_triangles.csv", &triangles);
    write(dir, "parcellation.csv", &labels);
    write(
        dir,
        "flne.csv",
        "# source,target,flne\nsource,target,flne\nV1,V2,0.68\nV1,V4,0.05\nV2,V4,0.42\nV1,MT,0.11\nV2,MT,0.09\nV4,V2,0.12\nMT,V4,0.05\n",
    );
    write(
        dir,
        "laminar.csv",
        "source,target,origin,termination\nV1,V2,S,F\nV2,V4,S,F\nV4,V2,I,M\nV1,MT,L2/3,L4\n",
    );
    write(
        dir,
        "spine_counts.csv",
        "area,spine_count\nV1,643\nV2,1035\nV4,2450\nMT,1510\nTEO,4500\n",
    );

    let connectivity = json!({
        "parcellation": "FV91",
        "areas": {
            "V1": { "hierarchy_level": 1, "layers": {
                "4": { "neuron_density": 400.0 },
                "2/3": { "neuron_density": 300.0 } } },
            "V2": { "hierarchy_level": 2, "layers": {
                "4": { "neuron_density": 250.0 },
                "2/3": { "neuron_density": 200.0 },
                "5": { "neuron_density": 100.0 } } },
            "V4": { "hierarchy_level": 3, "layers": {
                "4": { "neuron_density": 150.0 },
                "2/3": { "neuron_density": 120.0 } } },
            "MT": { "hierarchy_level": 3, "layers": {
                "4": { "neuron_density": 100.0 },
                "2/3": { "neuron_density": 80.0 } } }
        }
    });
    write(dir, "connectivity.json", &connectivity.to_string());
}

pub fn datasets_config(dir: &Path) -> DatasetsConfig {
    DatasetsConfig {
        data_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

pub fn write(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}
