// Copyright 2025 corticonv developers
// SPDX-License-Identifier: Apache-2.0

//! # corticonv-observability
//!
//! Logging infrastructure shared by the corticonv tools.
//!
//! Provides one console format for every pipeline stage, optional per-run
//! JSON log files, and per-crate debug flags (`--debug-corticonv-anatomy`).
//!
//! ## Features
//! - `file-logging`: per-run log folders with retention (enabled by default)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known corticonv crate names for debug flags and per-crate log files
///
/// No entry may be a target prefix of another: `EnvFilter` matches targets by prefix.
pub const KNOWN_CRATES: &[&str] = &[
    "corticonv-structures",
    "corticonv-config",
    "corticonv-anatomy",
    "corticonv-architecture",
];

/// Tracing target of a crate (`corticonv-anatomy` logs under `corticonv_anatomy`)
pub fn crate_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_targets_do_not_overlap() {
        for a in KNOWN_CRATES {
            for b in KNOWN_CRATES {
                if a != b {
                    assert!(
                        !crate_target(b).starts_with(&crate_target(a)),
                        "{} filter would also match {}",
                        a,
                        b
                    );
                }
            }
        }
    }
}
