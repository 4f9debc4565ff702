// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
Laminar vocabulary.

Connection origins and terminations are described with the fixed set of
cortical cell layers `L1, L2/3, L4, L5, L6`. Tracing tables either list the
layers explicitly (`L2/3;L5`) or use the Felleman & Van Essen shorthand:

| side | code | layers |
|---|---|---|
| origin | `S` supragranular | L2/3 |
| origin | `I` infragranular | L5, L6 |
| origin | `B` bilaminar | L2/3, L5, L6 |
| termination | `F` layer-4 (feedforward) | L4 |
| termination | `M` multilaminar, sparing L4 | L1, L2/3, L5, L6 |
| termination | `C` columnar | all layers |
*/

use crate::StructuresError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Cortical cell layer. L2 and L3 are modeled as one population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CorticalLayer {
    L1,
    L2_3,
    L4,
    L5,
    L6,
}

impl CorticalLayer {
    pub const ALL: [CorticalLayer; 5] = [
        CorticalLayer::L1,
        CorticalLayer::L2_3,
        CorticalLayer::L4,
        CorticalLayer::L5,
        CorticalLayer::L6,
    ];

    /// Label without the `L` prefix, as used in population names (`V1_2/3`)
    pub fn short_label(&self) -> &'static str {
        match self {
            CorticalLayer::L1 => "1",
            CorticalLayer::L2_3 => "2/3",
            CorticalLayer::L4 => "4",
            CorticalLayer::L5 => "5",
            CorticalLayer::L6 => "6",
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl FromStr for CorticalLayer {
    type Err = StructuresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed
            .strip_prefix('L')
            .or_else(|| trimmed.strip_prefix('l'))
            .unwrap_or(trimmed);
        match bare {
            "1" => Ok(CorticalLayer::L1),
            "2/3" | "23" | "2" | "3" => Ok(CorticalLayer::L2_3),
            "4" => Ok(CorticalLayer::L4),
            "5" => Ok(CorticalLayer::L5),
            "6" => Ok(CorticalLayer::L6),
            _ => Err(StructuresError::UnknownLaminarCode(format!(
                "'{}' is not one of L1, L2/3, L4, L5, L6",
                trimmed
            ))),
        }
    }
}

impl Display for CorticalLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.short_label())
    }
}

impl TryFrom<String> for CorticalLayer {
    type Error = StructuresError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CorticalLayer> for String {
    fn from(value: CorticalLayer) -> Self {
        value.short_label().to_string()
    }
}

/// Small set of cortical layers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<CorticalLayer>", into = "Vec<CorticalLayer>")]
pub struct LayerSet {
    bits: u8,
}

impl LayerSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        CorticalLayer::ALL.into_iter().collect()
    }

    pub fn insert(&mut self, layer: CorticalLayer) {
        self.bits |= layer.bit();
    }

    pub fn contains(&self, layer: CorticalLayer) -> bool {
        self.bits & layer.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Layers in superficial-to-deep order
    pub fn iter(&self) -> impl Iterator<Item = CorticalLayer> + '_ {
        CorticalLayer::ALL
            .into_iter()
            .filter(move |layer| self.contains(*layer))
    }

    /// Parse a `;`-separated layer list (`L2/3;L5`). Empty input gives an empty set.
    pub fn parse_list(list: &str) -> Result<Self, StructuresError> {
        let mut set = LayerSet::empty();
        for part in list.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            set.insert(part.parse()?);
        }
        Ok(set)
    }
}

impl FromIterator<CorticalLayer> for LayerSet {
    fn from_iter<T: IntoIterator<Item = CorticalLayer>>(iter: T) -> Self {
        let mut set = LayerSet::empty();
        for layer in iter {
            set.insert(layer);
        }
        set
    }
}

impl From<Vec<CorticalLayer>> for LayerSet {
    fn from(value: Vec<CorticalLayer>) -> Self {
        value.into_iter().collect()
    }
}

impl From<LayerSet> for Vec<CorticalLayer> {
    fn from(value: LayerSet) -> Self {
        value.iter().collect()
    }
}

impl Display for LayerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let labels: Vec<String> = self.iter().map(|l| l.to_string()).collect();
        f.write_str(&labels.join(";"))
    }
}

/// Laminar origin and termination of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaminarPattern {
    pub origin: LayerSet,
    pub termination: LayerSet,
}

impl LaminarPattern {
    pub fn new(origin: LayerSet, termination: LayerSet) -> Self {
        Self {
            origin,
            termination,
        }
    }

    /// Canonical feedforward pattern: L2/3 origin, L4 termination
    pub fn default_feedforward() -> Self {
        Self::new(
            [CorticalLayer::L2_3].into_iter().collect(),
            [CorticalLayer::L4].into_iter().collect(),
        )
    }

    /// Parse both sides of a tracing-table row. Returns `None` when both cells are empty.
    pub fn parse(origin: &str, termination: &str) -> Result<Option<Self>, StructuresError> {
        let origin = Self::parse_origin(origin)?;
        let termination = Self::parse_termination(termination)?;
        if origin.is_empty() && termination.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self::new(origin, termination)))
    }

    pub fn parse_origin(code: &str) -> Result<LayerSet, StructuresError> {
        use CorticalLayer::*;
        match code.trim() {
            "S" => Ok([L2_3].into_iter().collect()),
            "I" => Ok([L5, L6].into_iter().collect()),
            "B" => Ok([L2_3, L5, L6].into_iter().collect()),
            other => LayerSet::parse_list(other),
        }
    }

    pub fn parse_termination(code: &str) -> Result<LayerSet, StructuresError> {
        use CorticalLayer::*;
        match code.trim() {
            "F" => Ok([L4].into_iter().collect()),
            "M" => Ok([L1, L2_3, L5, L6].into_iter().collect()),
            "C" => Ok(LayerSet::all()),
            other => LayerSet::parse_list(other),
        }
    }

    /// Origin lies entirely in the supragranular layers (a feedforward signature)
    pub fn is_supragranular_origin(&self) -> bool {
        !self.origin.is_empty()
            && self
                .origin
                .iter()
                .all(|l| matches!(l, CorticalLayer::L1 | CorticalLayer::L2_3))
    }
}
