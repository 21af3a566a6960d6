// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! The store operations path-info reporting is built on.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::path_info::PathInfo;
use crate::store_path::{StoreDir, StorePath};

/// Read-only view of a store and its substituters.
///
/// Every reporting operation takes the store as a parameter; there is no
/// global store handle.
pub trait PathInfoStore: Send + Sync {
    fn store_dir(&self) -> &StoreDir;

    /// Printable form of `path`, e.g. `/nix/store/<hash>-<name>`.
    fn print_store_path(&self, path: &StorePath) -> String {
        self.store_dir().display_path(path)
    }

    /// Metadata for `path`, or `None` if it is not valid.
    fn query_path_info(
        &self,
        path: &StorePath,
    ) -> impl Future<Output = Result<Option<PathInfo>>> + Send;

    /// The transitive closure of `path` over its references, `path` included.
    fn query_closure(
        &self,
        path: &StorePath,
    ) -> impl Future<Output = Result<BTreeSet<StorePath>>> + Send;

    /// The subset of `paths` a substituter can provide.
    ///
    /// Called once per request with the whole set.
    fn query_substitutable_paths(
        &self,
        paths: &BTreeSet<StorePath>,
    ) -> impl Future<Output = Result<BTreeSet<StorePath>>> + Send;
}
