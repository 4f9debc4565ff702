// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

use crate::StructuresError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Cortical area identifier, a short code within a named parcellation scheme
/// (`V1`, `MT`, `7a`, `9/46d`, ...).
///
/// Identifiers are trimmed and must not be empty. Whitespace, list
/// separators (`,` `;`) and `_` are rejected: `_` joins area and layer in
/// population names (`V1_4`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AreaId(String);

impl AreaId {
    const RESERVED: &'static [char] = &['_', ',', ';'];

    pub fn new(code: &str) -> Result<Self, StructuresError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(StructuresError::InvalidAreaId(
                "identifier cannot be empty".to_string(),
            ));
        }
        if let Some(c) = code
            .chars()
            .find(|c| c.is_whitespace() || Self::RESERVED.contains(c))
        {
            return Err(StructuresError::InvalidAreaId(format!(
                "'{}' contains reserved character {:?}",
                code, c
            )));
        }
        Ok(AreaId(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AreaId {
    type Error = StructuresError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AreaId::new(&value)
    }
}

impl TryFrom<&str> for AreaId {
    type Error = StructuresError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        AreaId::new(value)
    }
}

impl From<AreaId> for String {
    fn from(value: AreaId) -> Self {
        value.0
    }
}

impl AsRef<str> for AreaId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
