// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::path::{Path, PathBuf};

use harmonia_store_db::SYSTEM_DB_PATH;

use crate::error::{ConfigError, Result};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "HARMONIA_PATH_INFO_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Path to the Nix store directory
    pub store_dir: PathBuf,

    /// Path to the Nix database
    pub db_path: PathBuf,

    /// Local binary cache directories queried for substitutes
    pub substituters: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from("/nix/store"),
            db_path: PathBuf::from(SYSTEM_DB_PATH),
            substituters: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load the configuration for the command line tool.
    ///
    /// `explicit` wins over `HARMONIA_PATH_INFO_CONFIG`; without either the
    /// defaults apply. `NIX_STORE_DIR` overrides the store directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let file = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let store_dir = std::env::var_os("NIX_STORE_DIR").map(PathBuf::from);
        Self::resolve(file.as_deref(), store_dir)
    }

    fn resolve(file: Option<&Path>, store_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(store_dir) = store_dir {
            config.store_dir = store_dir;
        }
        if !config.store_dir.is_absolute() {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "store_dir must be an absolute path, got '{}'",
                    config.store_dir.display()
                ),
            }
            .into());
        }
        Ok(config)
    }
}
