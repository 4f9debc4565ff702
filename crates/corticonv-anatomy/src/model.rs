// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
The unified anatomical model.

Built once from validated source tables; read-only afterwards.
*/

use crate::signatures::DatasetSignatures;
use crate::sources::{surface_extents, SourceTables};
use crate::types::AnatomyResult;
use corticonv_structures::{
    AreaId, ConnectionRecord, CorticalArea, Flne, LayerPopulation, Parcellation,
};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Areas, connections and layer populations aggregated from every source dataset
#[derive(Debug, Clone, PartialEq)]
pub struct AnatomicalModel {
    parcellation: Parcellation,
    areas: BTreeMap<AreaId, CorticalArea>,
    connections: BTreeMap<(AreaId, AreaId), ConnectionRecord>,
    populations: Vec<LayerPopulation>,
    signatures: DatasetSignatures,
}

impl AnatomicalModel {
    /// Build the model from source tables that passed validation
    ///
    /// # Errors
    ///
    /// Returns `AnatomyError::Structures` if a value violates a model
    /// invariant (only possible when validation was skipped).
    pub fn from_sources(tables: &SourceTables, signatures: DatasetSignatures) -> AnatomyResult<Self> {
        let extents = surface_extents(&tables.vertices, &tables.triangles, &tables.labels);
        let parcellation =
            Parcellation::new(tables.parcellation_scheme.clone()).with_areas(extents.keys().cloned());

        let spines: HashMap<&AreaId, f64> = tables
            .spine_counts
            .iter()
            .map(|row| (&row.area, row.spine_count))
            .collect();

        let mut areas = BTreeMap::new();
        for (id, extent) in &extents {
            let record = tables.connectivity.areas.get(id);
            let mut area = CorticalArea::new(id.clone(), *extent)?
                .with_hierarchy_level(record.and_then(|r| r.hierarchy_level))
                .with_spine_count(spines.get(id).copied())?;
            if let Some(record) = record {
                for (layer, density) in &record.layer_densities {
                    area.add_layer_density(*layer, *density)?;
                }
            }
            areas.insert(id.clone(), area);
        }

        let laminar: HashMap<(&AreaId, &AreaId), _> = tables
            .laminar
            .iter()
            .map(|row| ((&row.source, &row.target), row.pattern))
            .collect();

        let mut connections = BTreeMap::new();
        for row in &tables.flne {
            let pattern = laminar
                .get(&(&row.source, &row.target))
                .copied()
                .flatten();
            let record = ConnectionRecord::new(
                row.source.clone(),
                row.target.clone(),
                Flne::new(row.flne)?,
                pattern,
            )?;
            connections.insert((row.source.clone(), row.target.clone()), record);
        }

        let mut populations = Vec::new();
        for area in areas.values() {
            for layer in area.layer_densities.keys() {
                if let Some(count) = area.layer_neuron_count(*layer) {
                    populations.push(LayerPopulation::new(area.id.clone(), *layer, count)?);
                }
            }
        }

        for population in &populations {
            debug!(
                "[MODEL] Population {}: {:.0} neurons",
                population.name(),
                population.neuron_count
            );
        }
        info!(
            "[MODEL] {} parcellation: {} areas, {} connections, {} layer populations",
            parcellation.scheme,
            areas.len(),
            connections.len(),
            populations.len()
        );

        Ok(Self {
            parcellation,
            areas,
            connections,
            populations,
            signatures,
        })
    }

    pub fn parcellation(&self) -> &Parcellation {
        &self.parcellation
    }

    pub fn areas(&self) -> impl Iterator<Item = &CorticalArea> + '_ {
        self.areas.values()
    }

    pub fn area(&self, id: &AreaId) -> Option<&CorticalArea> {
        self.areas.get(id)
    }

    /// Connections ordered by (source, target)
    pub fn connections(&self) -> impl Iterator<Item = &ConnectionRecord> + '_ {
        self.connections.values()
    }

    pub fn connection(&self, source: &AreaId, target: &AreaId) -> Option<&ConnectionRecord> {
        self.connections.get(&(source.clone(), target.clone()))
    }

    pub fn populations(&self) -> &[LayerPopulation] {
        &self.populations
    }

    pub fn populations_of<'a>(&'a self, area: &'a AreaId) -> impl Iterator<Item = &'a LayerPopulation> + 'a {
        self.populations.iter().filter(move |p| &p.area == area)
    }

    pub fn signatures(&self) -> &DatasetSignatures {
        &self.signatures
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}
