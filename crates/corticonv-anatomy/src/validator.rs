/*!
Cross-dataset validation.

Checks that identifiers and value ranges are self-consistent across the
source tables. Problems are collected, not raised, so one run reports all of
them. Provides clear messages naming the dataset and line of each problem.

Copyright 2025 corticonv developers
Licensed under the Apache License, Version 2.0
*/

use crate::sources::{surface_extents, SourceTables};
use corticonv_config::ValidationConfig;
use corticonv_structures::AreaId;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::Display;

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Whether the datasets are valid
    pub valid: bool,
    /// Blocking issues
    pub errors: Vec<String>,
    /// Non-blocking issues
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: String) {
        self.valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationReport) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Turn every warning into an error (strict mode)
    pub fn promote_warnings(&mut self) {
        for warning in std::mem::take(&mut self.warnings) {
            self.add_error(format!("(strict) {}", warning));
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{}: {} error(s), {} warning(s)",
            if self.valid { "VALID" } else { "INVALID" },
            self.errors.len(),
            self.warnings.len()
        )?;
        for error in &self.errors {
            writeln!(f, "  error: {}", error)?;
        }
        for warning in &self.warnings {
            writeln!(f, "  warning: {}", warning)?;
        }
        Ok(())
    }
}

/// Validate the parsed source tables against each other
pub fn validate_sources(tables: &SourceTables, config: &ValidationConfig) -> ValidationReport {
    let mut result = ValidationReport::new();

    let areas: BTreeSet<AreaId> = tables.labels.iter().map(|l| l.area.clone()).collect();
    if areas.is_empty() {
        result.add_error("parcellation: no labelled vertices, the area set is empty".to_string());
    }

    validate_scheme(tables, &mut result);
    validate_mesh(tables, &mut result);
    validate_flne(tables, &areas, config, &mut result);
    validate_laminar(tables, &areas, &mut result);
    validate_connectivity(tables, &areas, &mut result);
    validate_spine_counts(tables, &areas, &mut result);
    validate_extents(tables, &mut result);

    if config.strict {
        result.promote_warnings();
    }

    result
}

fn check_value(what: String, value: f64, result: &mut ValidationReport) -> bool {
    if !value.is_finite() {
        result.add_error(format!("{} is not finite ({})", what, value));
        false
    } else if value < 0.0 {
        result.add_error(format!("{} is negative ({})", what, value));
        false
    } else {
        true
    }
}

fn validate_scheme(tables: &SourceTables, result: &mut ValidationReport) {
    if tables.connectivity.parcellation != tables.parcellation_scheme {
        result.add_error(format!(
            "connectivity: parcellation '{}' does not match the configured scheme '{}'",
            tables.connectivity.parcellation, tables.parcellation_scheme
        ));
    }
}

fn validate_mesh(tables: &SourceTables, result: &mut ValidationReport) {
    let count = tables.vertices.len();
    let mut seen = HashSet::new();
    for vertex in &tables.vertices {
        if vertex.index >= count {
            result.add_error(format!(
                "surface_vertices line {}: index {} out of range ({} vertices)",
                vertex.line, vertex.index, count
            ));
        }
        if !seen.insert(vertex.index) {
            result.add_error(format!(
                "surface_vertices line {}: duplicate vertex index {}",
                vertex.line, vertex.index
            ));
        }
        if vertex.position.iter().any(|c| !c.is_finite()) {
            result.add_error(format!(
                "surface_vertices line {}: vertex {} has a non-finite coordinate",
                vertex.line, vertex.index
            ));
        }
    }

    for triangle in &tables.triangles {
        for index in triangle.vertices {
            if !seen.contains(&index) {
                result.add_error(format!(
                    "surface_triangles line {}: vertex {} out of range ({} vertices)",
                    triangle.line, index, count
                ));
            }
        }
    }

    let mut labelled = HashSet::new();
    for label in &tables.labels {
        if !seen.contains(&label.vertex) {
            result.add_error(format!(
                "parcellation line {}: vertex {} out of range ({} vertices)",
                label.line, label.vertex, count
            ));
        }
        if !labelled.insert(label.vertex) {
            result.add_error(format!(
                "parcellation line {}: vertex {} labelled more than once",
                label.line, label.vertex
            ));
        }
    }
}

fn validate_flne(
    tables: &SourceTables,
    areas: &BTreeSet<AreaId>,
    config: &ValidationConfig,
    result: &mut ValidationReport,
) {
    let mut seen = HashSet::new();
    let mut inbound: BTreeMap<&AreaId, f64> = BTreeMap::new();

    for row in &tables.flne {
        let at = format!("flne line {}", row.line);
        check_areas(&at, &row.source, &row.target, areas, result);

        if row.source == row.target {
            result.add_error(format!(
                "{}: self-connection {} -> {} (FLNe counts extrinsic neurons only)",
                at, row.source, row.target
            ));
        }
        if !seen.insert((&row.source, &row.target)) {
            result.add_error(format!(
                "{}: duplicate connection {} -> {}",
                at, row.source, row.target
            ));
        }

        if check_value(format!("{}: FLNe", at), row.flne, result) {
            if row.flne > config.max_flne {
                result.add_error(format!(
                    "{}: FLNe {} exceeds the maximum {}",
                    at, row.flne, config.max_flne
                ));
            }
            *inbound.entry(&row.target).or_insert(0.0) += row.flne;
        }
    }

    for (target, total) in inbound {
        if total > 1.0 + config.flne_sum_tolerance {
            result.add_warning(format!(
                "flne: inbound FLNe of {} sums to {:.4} (> 1 + {})",
                target, total, config.flne_sum_tolerance
            ));
        }
    }
}

fn validate_laminar(tables: &SourceTables, areas: &BTreeSet<AreaId>, result: &mut ValidationReport) {
    let flne_keys: HashSet<(&AreaId, &AreaId)> =
        tables.flne.iter().map(|r| (&r.source, &r.target)).collect();
    let mut seen = HashSet::new();

    for row in &tables.laminar {
        let at = format!("laminar line {}", row.line);
        check_areas(&at, &row.source, &row.target, areas, result);

        if row.source == row.target {
            result.add_error(format!("{}: self-connection {} -> {}", at, row.source, row.target));
        }
        let key = (&row.source, &row.target);
        if !seen.insert(key) {
            result.add_error(format!(
                "{}: duplicate connection {} -> {}",
                at, row.source, row.target
            ));
        }
        if !flne_keys.contains(&key) {
            result.add_warning(format!(
                "{}: laminar pattern for {} -> {} has no FLNe row",
                at, row.source, row.target
            ));
        }
    }
}

fn validate_connectivity(tables: &SourceTables, areas: &BTreeSet<AreaId>, result: &mut ValidationReport) {
    for (id, record) in &tables.connectivity.areas {
        if !areas.contains(id) {
            result.add_error(format!(
                "connectivity: area {} is not in the parcellation",
                id
            ));
        }
        for (layer, density) in &record.layer_densities {
            check_value(format!("connectivity: {} density of {}", layer, id), *density, result);
        }
    }

    for id in areas {
        let has_densities = tables
            .connectivity
            .areas
            .get(id)
            .is_some_and(|r| !r.layer_densities.is_empty());
        if !has_densities {
            result.add_warning(format!(
                "connectivity: area {} has no neuron densities, it gets no populations",
                id
            ));
        }
    }
}

fn validate_spine_counts(tables: &SourceTables, areas: &BTreeSet<AreaId>, result: &mut ValidationReport) {
    let mut seen = HashSet::new();
    for row in &tables.spine_counts {
        let at = format!("spine_counts line {}", row.line);
        if !areas.contains(&row.area) {
            result.add_warning(format!("{}: area {} is not in the parcellation", at, row.area));
        }
        if !seen.insert(&row.area) {
            result.add_error(format!("{}: duplicate spine count for {}", at, row.area));
        }
        check_value(format!("{}: spine count", at), row.spine_count, result);
    }
}

fn validate_extents(tables: &SourceTables, result: &mut ValidationReport) {
    let extents = surface_extents(&tables.vertices, &tables.triangles, &tables.labels);
    for (area, extent) in extents {
        if extent <= 0.0 {
            result.add_warning(format!("surface: area {} has zero surface extent", area));
        }
    }
}

fn check_areas(
    at: &str,
    source: &AreaId,
    target: &AreaId,
    areas: &BTreeSet<AreaId>,
    result: &mut ValidationReport,
) {
    for (role, area) in [("source", source), ("target", target)] {
        if !areas.contains(area) {
            result.add_error(format!(
                "{}: {} area {} is not in the parcellation",
                at, role, area
            ));
        }
    }
}
