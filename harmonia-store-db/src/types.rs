// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database row types for Nix store metadata.

use std::collections::BTreeSet;

/// A row of the `ValidPaths` table together with its references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPathInfo {
    /// Database row ID
    pub id: i64,
    /// Full store path (e.g., /nix/store/xxx-name)
    pub path: String,
    /// Hash of the NAR serialisation, `<algo>:<digest>`
    pub hash: String,
    /// Registration time as a Unix timestamp
    pub registration_time: i64,
    /// Store path of the derivation that produced this (if any)
    pub deriver: Option<String>,
    /// Size of the NAR serialization
    pub nar_size: Option<u64>,
    /// Whether this is an "ultimate" path (built locally, not substituted)
    pub ultimate: bool,
    /// Space-separated signatures
    pub sigs: Option<String>,
    /// Content address assertion (if content-addressed)
    pub ca: Option<String>,
    /// Full store paths this path references
    pub references: BTreeSet<String>,
}

impl ValidPathInfo {
    /// Signatures in storage order. Duplicates are kept.
    pub fn signatures(&self) -> Vec<&str> {
        self.sigs
            .as_deref()
            .map(|s| s.split_whitespace().collect())
            .unwrap_or_default()
    }
}
