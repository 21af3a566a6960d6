// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! A [`PathInfoStore`] backed by the local store database and local binary
//! cache directories.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use harmonia_store_db::{StoreDb, ValidPathInfo};

use crate::config::Config;
use crate::error::{DbContext, IoContext, PathInfoError, Result};
use crate::path_info::{ContentAddress, PathInfo};
use crate::store::PathInfoStore;
use crate::store_path::{StoreDir, StorePath};

/// A binary cache in a local directory, as written by `nix copy --to file://…`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBinaryCache {
    root: PathBuf,
}

impl FileBinaryCache {
    /// Open the cache at `root`.
    ///
    /// Returns `None`, with a warning, when the cache's `nix-cache-info`
    /// declares a different store directory: its paths cannot substitute
    /// ours.
    pub fn open(root: impl Into<PathBuf>, store_dir: &StoreDir) -> Result<Option<Self>> {
        let root = root.into();
        let info_path = root.join("nix-cache-info");
        let info = match std::fs::read_to_string(&info_path) {
            Ok(info) => info,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("{} has no nix-cache-info", root.display());
                return Ok(Some(Self { root }));
            }
            Err(e) => {
                return Err(e).io_context(|| format!("Failed to read {}", info_path.display()));
            }
        };

        let cache_store_dir = info
            .lines()
            .find_map(|line| line.strip_prefix("StoreDir:"))
            .map(str::trim);
        match cache_store_dir {
            Some(dir) if dir != store_dir.as_str() => {
                warn!(
                    "ignoring binary cache {}: it serves store {dir}, not {store_dir}",
                    root.display()
                );
                Ok(None)
            }
            _ => Ok(Some(Self { root })),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn narinfo_path(&self, path: &StorePath) -> PathBuf {
        self.root.join(format!("{}.narinfo", path.hash_part()))
    }

    /// Whether the cache holds a `.narinfo` for `path`.
    pub fn has_path(&self, path: &StorePath) -> Result<bool> {
        let narinfo = self.narinfo_path(path);
        narinfo.try_exists().map_err(|e| {
            PathInfoError::substituter(format!("checking {}: {e}", narinfo.display()))
        })
    }
}

/// The local store: metadata from the SQLite database, substitutes from
/// local binary caches.
#[derive(Clone)]
pub struct LocalStore {
    store_dir: StoreDir,
    db: Arc<Mutex<StoreDb>>,
    substituters: Arc<[FileBinaryCache]>,
}

impl LocalStore {
    /// Open the database and binary caches named by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        let store_dir = StoreDir::new(config.store_dir.to_string_lossy())?;
        let db = StoreDb::open_read_only(&config.db_path).db_context(|| {
            format!("Failed to open store database {}", config.db_path.display())
        })?;
        let mut substituters = Vec::with_capacity(config.substituters.len());
        for root in &config.substituters {
            substituters.extend(FileBinaryCache::open(root, &store_dir)?);
        }
        debug!(
            "opened local store {store_dir} with {} substituters",
            substituters.len()
        );
        Ok(Self::from_db(store_dir, db).with_substituters(substituters))
    }

    pub fn from_db(store_dir: StoreDir, db: StoreDb) -> Self {
        Self {
            store_dir,
            db: Arc::new(Mutex::new(db)),
            substituters: Vec::new().into(),
        }
    }

    pub fn with_substituters(mut self, substituters: Vec<FileBinaryCache>) -> Self {
        self.substituters = substituters.into();
        self
    }

    /// Execute a database operation on the blocking pool
    async fn db_operation<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&StoreDb) -> Result<T> + Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || {
            let db = db.blocking_lock();
            f(&db)
        })
        .await?
    }

    fn path_info_from_row(&self, row: ValidPathInfo) -> Result<PathInfo> {
        let path = self.store_dir.parse_path(&row.path)?;
        let nar_size = row.nar_size.unwrap_or_else(|| {
            warn!("{} has no NAR size recorded", row.path);
            0
        });
        Ok(PathInfo {
            nar_hash: row.hash.clone(),
            nar_size,
            references: row
                .references
                .iter()
                .map(|r| self.store_dir.parse_path(r))
                .collect::<std::result::Result<BTreeSet<_>, _>>()?,
            deriver: row
                .deriver
                .as_deref()
                .map(|d| self.store_dir.parse_path(d))
                .transpose()?,
            registration_time: u64::try_from(row.registration_time).unwrap_or(0),
            ultimate: row.ultimate,
            signatures: row.signatures().into_iter().map(String::from).collect(),
            ca: row.ca.map(ContentAddress::from),
            path,
        })
    }
}

impl PathInfoStore for LocalStore {
    fn store_dir(&self) -> &StoreDir {
        &self.store_dir
    }

    async fn query_path_info(&self, path: &StorePath) -> Result<Option<PathInfo>> {
        let printed = self.print_store_path(path);
        let row = self
            .db_operation(move |db| {
                db.query_path_info(&printed)
                    .db_context(|| format!("Failed to query path info for '{printed}'"))
            })
            .await?;
        row.map(|row| self.path_info_from_row(row)).transpose()
    }

    async fn query_closure(&self, path: &StorePath) -> Result<BTreeSet<StorePath>> {
        let printed = self.print_store_path(path);
        let closure = self
            .db_operation(move |db| {
                db.query_closure(&printed)
                    .db_context(|| format!("Failed to compute closure of '{printed}'"))
            })
            .await?;
        closure
            .iter()
            .map(|member| {
                self.store_dir
                    .parse_path(member)
                    .map_err(PathInfoError::from)
            })
            .collect()
    }

    async fn query_substitutable_paths(
        &self,
        paths: &BTreeSet<StorePath>,
    ) -> Result<BTreeSet<StorePath>> {
        if self.substituters.is_empty() {
            return Ok(BTreeSet::new());
        }
        let substituters = self.substituters.clone();
        let paths = paths.clone();
        tokio::task::spawn_blocking(move || {
            let mut found = BTreeSet::new();
            for path in paths {
                for cache in substituters.iter() {
                    if cache.has_path(&path)? {
                        debug!("{path} is substitutable from {}", cache.root().display());
                        found.insert(path);
                        break;
                    }
                }
            }
            Ok::<_, PathInfoError>(found)
        })
        .await?
    }
}
