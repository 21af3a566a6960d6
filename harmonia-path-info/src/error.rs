// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::store_path::StorePathError;

#[derive(Error, Debug)]
pub enum PathInfoError {
    /// A requested path, or a member of its closure, has no metadata.
    #[error("path '{path}' is not valid")]
    NotFound { path: String },

    #[error("Failed to query substitutes: {reason}")]
    SubstituterQuery { reason: String },

    #[error("Failed to render JSON: {0}")]
    Render(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidStorePath(#[from] StorePathError),

    #[error("{context}: {source}")]
    Store {
        context: String,
        #[source]
        source: harmonia_store_db::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

pub type Result<T> = std::result::Result<T, PathInfoError>;

impl PathInfoError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn substituter(reason: impl Into<String>) -> Self {
        Self::SubstituterQuery {
            reason: reason.into(),
        }
    }
}

/// Helper trait for adding context to IO errors
pub trait IoContext<T> {
    fn io_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| PathInfoError::Io {
            context: f(),
            source,
        })
    }
}

/// Helper trait for adding context to database errors
pub trait DbContext<T> {
    fn db_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> DbContext<T> for harmonia_store_db::Result<T> {
    fn db_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| PathInfoError::Store {
            context: f(),
            source,
        })
    }
}
