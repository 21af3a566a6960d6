// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Splitting a request into substitutable and missing paths.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::Result;
use crate::store::PathInfoStore;
use crate::store_path::StorePath;

/// Substitutability of one request.
///
/// Only valid for the request it was computed for: availability in the
/// substituters can change between queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Requested paths a substituter can provide
    pub substitutable: BTreeSet<StorePath>,
    /// The remaining requested paths, in request order
    pub missing: Vec<StorePath>,
}

impl Partition {
    pub fn is_substitutable(&self, path: &StorePath) -> bool {
        self.substitutable.contains(path)
    }
}

/// Partition `paths` given the set the substituters reported.
///
/// Paths the substituters reported but that were never requested are
/// dropped.
pub fn partition(paths: &[StorePath], substitutable: BTreeSet<StorePath>) -> Partition {
    let requested: BTreeSet<&StorePath> = paths.iter().collect();
    let substitutable: BTreeSet<StorePath> = substitutable
        .into_iter()
        .filter(|path| requested.contains(path))
        .collect();
    let missing = paths
        .iter()
        .filter(|path| !substitutable.contains(*path))
        .cloned()
        .collect();
    Partition {
        substitutable,
        missing,
    }
}

/// Ask the store which of `paths` are substitutable, in a single batch.
pub async fn query_partition<S: PathInfoStore>(store: &S, paths: &[StorePath]) -> Result<Partition> {
    let request: BTreeSet<StorePath> = paths.iter().cloned().collect();
    let substitutable = store.query_substitutable_paths(&request).await?;
    let partition = partition(paths, substitutable);
    debug!(
        "{} of {} requested paths are substitutable",
        partition.substitutable.len(),
        request.len()
    );
    Ok(partition)
}
