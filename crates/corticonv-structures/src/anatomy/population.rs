// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

use super::{check_measure, AreaId, CorticalLayer};
use crate::StructuresError;
use serde::{Deserialize, Serialize};

/// Modeled excitatory population of one (cortical area, cell layer) pair.
///
/// This is the unit later mapped to a network layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerPopulation {
    pub area: AreaId,
    pub layer: CorticalLayer,
    pub neuron_count: f64,
}

impl LayerPopulation {
    pub fn new(area: AreaId, layer: CorticalLayer, neuron_count: f64) -> Result<Self, StructuresError> {
        let neuron_count = check_measure(
            &format!("neuron count of {}_{}", area, layer.short_label()),
            neuron_count,
        )?;
        Ok(Self {
            area,
            layer,
            neuron_count,
        })
    }

    /// Population name, `<area>_<layer>` (e.g. `V1_4`, `V2_2/3`)
    pub fn name(&self) -> String {
        format!("{}_{}", self.area, self.layer.short_label())
    }

    /// Split a population name into its area and layer
    pub fn parse_name(name: &str) -> Result<(AreaId, CorticalLayer), StructuresError> {
        let (area, layer) = name.split_once('_').ok_or_else(|| {
            StructuresError::BadParameters(format!(
                "population name '{}' is not of the form <area>_<layer>",
                name
            ))
        })?;
        Ok((AreaId::new(area)?, layer.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        let pop = LayerPopulation::new(AreaId::new("V2").unwrap(), CorticalLayer::L2_3, 10.0).unwrap();
        assert_eq!(pop.name(), "V2_2/3");
        let (area, layer) = LayerPopulation::parse_name(&pop.name()).unwrap();
        assert_eq!(area, pop.area);
        assert_eq!(layer, pop.layer);
    }

    #[test]
    fn test_parse_name_errors() {
        assert!(LayerPopulation::parse_name("V1").is_err());
        assert!(LayerPopulation::parse_name("V1_9").is_err());
    }
}
