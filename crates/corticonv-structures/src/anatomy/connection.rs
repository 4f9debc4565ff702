// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

use super::{check_measure, AreaId, LaminarPattern};
use crate::StructuresError;
use serde::{Deserialize, Serialize};

/// Fraction of labelled neurons external to the injection site.
///
/// Non-negative and finite by construction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Flne(f64);

impl Flne {
    pub fn new(value: f64) -> Result<Self, StructuresError> {
        check_measure("FLNe", value).map(Flne)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Flne {
    type Error = StructuresError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Flne::new(value)
    }
}

impl From<Flne> for f64 {
    fn from(value: Flne) -> Self {
        value.0
    }
}

/// Directed inter-areal connection (source projects to target)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub source: AreaId,
    pub target: AreaId,
    pub flne: Flne,
    /// Laminar origin/termination, when the tracing data reports it
    #[serde(default)]
    pub laminar: Option<LaminarPattern>,
}

impl ConnectionRecord {
    /// Create a connection record
    ///
    /// # Errors
    ///
    /// Returns error if source and target are the same area (FLNe only
    /// counts neurons external to the injected area)
    pub fn new(
        source: AreaId,
        target: AreaId,
        flne: Flne,
        laminar: Option<LaminarPattern>,
    ) -> Result<Self, StructuresError> {
        if source == target {
            return Err(StructuresError::BadParameters(format!(
                "connection {} -> {} is a self-connection",
                source, target
            )));
        }
        Ok(Self {
            source,
            target,
            flne,
            laminar,
        })
    }

    pub fn key(&self) -> (&AreaId, &AreaId) {
        (&self.source, &self.target)
    }
}
