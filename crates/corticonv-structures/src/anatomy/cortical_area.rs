// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
CorticalArea data structure (anatomical representation).

Pure data definition - no business logic.
Aggregation from source datasets lives in corticonv-anatomy.
*/

use super::{check_measure, AreaId, CorticalLayer};
use crate::StructuresError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cortical area metadata
///
/// Read-only after construction by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorticalArea {
    /// Identifier within the parcellation scheme
    pub id: AreaId,

    /// Surface extent in mm², summed from the labelled surface mesh
    pub surface_extent: f64,

    /// Position in the cortical hierarchy (1 = primary sensory), if known
    #[serde(default)]
    pub hierarchy_level: Option<u32>,

    /// Neuron density (neurons / mm²) per modeled layer
    #[serde(default)]
    pub layer_densities: BTreeMap<CorticalLayer, f64>,

    /// Mean basal-dendrite spine count of layer 3 pyramidal cells
    #[serde(default)]
    pub spine_count: Option<f64>,
}

impl CorticalArea {
    /// Create a new cortical area with validation
    ///
    /// # Errors
    ///
    /// Returns error if the surface extent is negative or not finite
    pub fn new(id: AreaId, surface_extent: f64) -> Result<Self, StructuresError> {
        let surface_extent = check_measure(&format!("surface extent of {}", id), surface_extent)?;
        Ok(Self {
            id,
            surface_extent,
            hierarchy_level: None,
            layer_densities: BTreeMap::new(),
            spine_count: None,
        })
    }

    pub fn with_hierarchy_level(mut self, level: Option<u32>) -> Self {
        self.hierarchy_level = level;
        self
    }

    pub fn with_spine_count(mut self, spine_count: Option<f64>) -> Result<Self, StructuresError> {
        if let Some(count) = spine_count {
            check_measure(&format!("spine count of {}", self.id), count)?;
        }
        self.spine_count = spine_count;
        Ok(self)
    }

    /// Set the neuron density of one layer
    pub fn add_layer_density(
        &mut self,
        layer: CorticalLayer,
        density: f64,
    ) -> Result<(), StructuresError> {
        let density = check_measure(&format!("{} density of {}", layer, self.id), density)?;
        self.layer_densities.insert(layer, density);
        Ok(())
    }

    /// Modeled neuron count of one layer: density × surface extent
    pub fn layer_neuron_count(&self, layer: CorticalLayer) -> Option<f64> {
        self.layer_densities
            .get(&layer)
            .map(|density| density * self.surface_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_neuron_count() {
        let mut area = CorticalArea::new(AreaId::new("V1").unwrap(), 1200.0).unwrap();
        area.add_layer_density(CorticalLayer::L4, 100.0).unwrap();
        assert_eq!(area.layer_neuron_count(CorticalLayer::L4), Some(120_000.0));
        assert_eq!(area.layer_neuron_count(CorticalLayer::L5), None);
    }

    #[test]
    fn test_rejects_negative_values() {
        let id = AreaId::new("V2").unwrap();
        assert!(CorticalArea::new(id.clone(), -1.0).is_err());
        let mut area = CorticalArea::new(id, 10.0).unwrap();
        assert!(area.add_layer_density(CorticalLayer::L2_3, -5.0).is_err());
        assert!(area.with_spine_count(Some(f64::NAN)).is_err());
    }
}
