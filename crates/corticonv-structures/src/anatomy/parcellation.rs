// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

use super::AreaId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named parcellation scheme and the set of area identifiers it defines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcellation {
    pub scheme: String,
    pub areas: BTreeSet<AreaId>,
}

impl Parcellation {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            areas: BTreeSet::new(),
        }
    }

    pub fn with_areas<I: IntoIterator<Item = AreaId>>(mut self, areas: I) -> Self {
        self.areas.extend(areas);
        self
    }

    pub fn contains(&self, area: &AreaId) -> bool {
        self.areas.contains(area)
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
