// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

/*!
JSON connectivity dataset keyed by area and layer.

```json
{
  "parcellation": "FV91",
  "areas": {
    "V1": {
      "hierarchy_level": 1,
      "layers": { "4": { "neuron_density": 190000.0 } }
    }
  }
}
```
*/

use crate::types::{AnatomyError, AnatomyResult};
use corticonv_structures::{AreaId, CorticalLayer};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

/// Per-area record of the JSON dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AreaRecord {
    pub hierarchy_level: Option<u32>,
    /// Neuron density (neurons / mm²) per layer; raw values, range-checked by the validator
    pub layer_densities: BTreeMap<CorticalLayer, f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectivityDataset {
    pub parcellation: String,
    pub areas: BTreeMap<AreaId, AreaRecord>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDataset {
    parcellation: String,
    #[serde(default, deserialize_with = "unique_entries")]
    areas: Vec<(String, RawArea)>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArea {
    #[serde(default)]
    hierarchy_level: Option<u32>,
    #[serde(default, deserialize_with = "unique_entries")]
    layers: Vec<(String, RawLayer)>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawLayer {
    neuron_density: f64,
}

/// JSON object as entries in document order; a repeated key is an error
fn unique_entries<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct EntriesVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an object with unique keys")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut seen = HashSet::new();
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                if !seen.insert(key.clone()) {
                    return Err(serde::de::Error::custom(format!(
                        "key '{}' is listed more than once",
                        key
                    )));
                }
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

/// Load the JSON dataset from a file
pub fn read_connectivity_json(path: &Path) -> AnatomyResult<ConnectivityDataset> {
    let json_str = std::fs::read_to_string(path).map_err(|source| AnatomyError::Io {
        file: path.to_path_buf(),
        source,
    })?;
    parse_connectivity_json(&json_str).map_err(|reason| AnatomyError::Json {
        file: path.to_path_buf(),
        reason,
    })
}

fn parse_connectivity_json(json_str: &str) -> Result<ConnectivityDataset, String> {
    let raw: RawDataset = serde_json::from_str(json_str).map_err(|e| e.to_string())?;

    let mut areas = BTreeMap::new();
    for (code, raw_area) in raw.areas {
        let id = AreaId::new(&code).map_err(|e| format!("area '{}': {}", code, e))?;

        let mut record = AreaRecord {
            hierarchy_level: raw_area.hierarchy_level,
            layer_densities: BTreeMap::new(),
        };
        for (label, layer) in raw_area.layers {
            let parsed: CorticalLayer = label
                .parse()
                .map_err(|e| format!("area '{}', layer '{}': {}", code, label, e))?;
            if record
                .layer_densities
                .insert(parsed, layer.neuron_density)
                .is_some()
            {
                return Err(format!(
                    "area '{}': layer '{}' duplicates {}",
                    code, label, parsed
                ));
            }
        }

        if areas.insert(id, record).is_some() {
            return Err(format!("area '{}' is listed more than once", code));
        }
    }

    Ok(ConnectivityDataset {
        parcellation: raw.parcellation,
        areas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::test_support::write_table;
    use serde_json::json;

    #[test]
    fn test_parse_dataset() {
        let doc = json!({
            "parcellation": "FV91",
            "areas": {
                "V1": {
                    "hierarchy_level": 1,
                    "layers": {
                        "4": { "neuron_density": 190000.0 },
                        "2/3": { "neuron_density": 95000.0 }
                    }
                },
                "V2": { "layers": { "L5": { "neuron_density": 40000.0 } } }
            }
        });
        let dataset = parse_connectivity_json(&doc.to_string()).unwrap();
        assert_eq!(dataset.parcellation, "FV91");

        let v1 = &dataset.areas[&AreaId::new("V1").unwrap()];
        assert_eq!(v1.hierarchy_level, Some(1));
        assert_eq!(v1.layer_densities[&CorticalLayer::L2_3], 95000.0);

        let v2 = &dataset.areas[&AreaId::new("V2").unwrap()];
        assert_eq!(v2.hierarchy_level, None);
        assert!(v2.layer_densities.contains_key(&CorticalLayer::L5));
    }

    #[test]
    fn test_aliased_layers_rejected() {
        let doc = json!({
            "parcellation": "FV91",
            "areas": { "V1": { "layers": {
                "2": { "neuron_density": 1.0 },
                "3": { "neuron_density": 2.0 }
            } } }
        });
        let err = parse_connectivity_json(&doc.to_string()).unwrap_err();
        assert!(err.contains("duplicates"));
    }

    #[test]
    fn test_repeated_area_key_rejected() {
        // json! would collapse the repeated key, so the document is written by hand
        let doc = r#"{ "parcellation": "FV91", "areas": {
            "V1": { "layers": { "4": { "neuron_density": 100.0 } } },
            "V1": { "layers": { "5": { "neuron_density": 7.0 } } }
        } }"#;
        let err = parse_connectivity_json(doc).unwrap_err();
        assert!(err.contains("more than once"), "{}", err);
    }

    #[test]
    fn test_area_codes_equal_after_trimming_rejected() {
        let doc = json!({ "parcellation": "FV91", "areas": {
            "V1": { "layers": { "4": { "neuron_density": 100.0 } } },
            "V1 ": { "layers": { "5": { "neuron_density": 7.0 } } }
        } });
        let err = parse_connectivity_json(&doc.to_string()).unwrap_err();
        assert!(err.contains("more than once"), "{}", err);
    }

    #[test]
    fn test_repeated_layer_key_rejected() {
        let doc = r#"{ "parcellation": "FV91", "areas": { "V1": { "layers": {
            "4": { "neuron_density": 100.0 },
            "4": { "neuron_density": 7.0 }
        } } } }"#;
        let err = parse_connectivity_json(doc).unwrap_err();
        assert!(err.contains("more than once"), "{}", err);
    }

    #[test]
    fn test_unknown_field_and_layer() {
        let typo = json!({ "parcellation": "FV91", "areas": { "V1": { "hierarcy_level": 1 } } });
        assert!(parse_connectivity_json(&typo.to_string()).is_err());

        let layer = json!({ "parcellation": "FV91", "areas": { "V1": { "layers": { "7": { "neuron_density": 1.0 } } } } });
        assert!(parse_connectivity_json(&layer.to_string()).is_err());
    }

    #[test]
    fn test_read_file_errors() {
        let (_dir, path) = write_table("connectivity.json", "{ not json");
        assert!(matches!(
            read_connectivity_json(&path),
            Err(AnatomyError::Json { .. })
        ));
    }
}
