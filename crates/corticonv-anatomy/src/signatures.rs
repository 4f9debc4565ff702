/*!
Dataset signature generation for provenance.

Signatures are SHA-256 hashes of the raw source files, so a derived
architecture can be traced back to the exact inputs it was built from.

Copyright 2025 corticonv developers
Licensed under the Apache License, Version 2.0
*/

use crate::manifest::DatasetManifest;
use crate::types::{AnatomyError, AnatomyResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Per-file and combined signatures of one aggregation run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatasetSignatures {
    /// Dataset label → signature, for every file that was read
    pub files: BTreeMap<String, String>,
    /// Signature over all per-file signatures
    pub combined: String,
}

impl DatasetSignatures {
    pub fn get(&self, label: &str) -> Option<&str> {
        self.files.get(label).map(String::as_str)
    }
}

/// Sign every manifest file present on disk
pub fn generate_signatures(manifest: &DatasetManifest) -> AnatomyResult<DatasetSignatures> {
    let mut files = BTreeMap::new();
    for file in &manifest.files {
        if !file.exists() {
            continue;
        }
        let bytes = std::fs::read(&file.path).map_err(|source| AnatomyError::Io {
            file: file.path.clone(),
            source,
        })?;
        files.insert(file.kind.label().to_string(), hash_bytes(&bytes));
    }

    let combined_input: String = files
        .iter()
        .map(|(label, signature)| format!("{}:{}\n", label, signature))
        .collect();

    Ok(DatasetSignatures {
        combined: hash_bytes(combined_input.as_bytes()),
        files,
    })
}

/// SHA-256 of the bytes, first 16 hex chars
pub(crate) fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use corticonv_config::DatasetsConfig;

    #[test]
    fn test_hash_bytes() {
        let hash1 = hash_bytes(b"source,target,flne\n");
        let hash2 = hash_bytes(b"source,target,flne\n");
        let hash3 = hash_bytes(b"source,target,flne\nV1,V2,0.1\n");

        assert_eq!(hash1, hash2, "Same input should produce same hash");
        assert_ne!(hash1, hash3, "Different inputs should produce different hashes");
        assert_eq!(hash1.len(), 16, "Hash should be 16 characters");
    }

    #[test]
    fn test_signatures_cover_present_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("flne.csv"), "source,target,flne\n").unwrap();
        let config = DatasetsConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let manifest = DatasetManifest::from_config(&config);

        let signatures = generate_signatures(&manifest).unwrap();
        assert_eq!(signatures.files.len(), 1);
        assert_eq!(signatures.get("flne").map(str::len), Some(16));
        assert_eq!(signatures.combined.len(), 16);
    }
}
