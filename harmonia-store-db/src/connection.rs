// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Database connection management.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{Error, Result};
use crate::schema::SCHEMA_SQL;

/// Default location of the system database.
pub const SYSTEM_DB_PATH: &str = "/nix/var/nix/db/db.sqlite";

/// SQLite database connection for Nix store metadata.
pub struct StoreDb {
    pub(crate) conn: Connection,
}

impl StoreDb {
    /// Open an existing database read-only.
    ///
    /// The database is opened through an `immutable=1` URI so no locks are
    /// taken and no journal is created next to it.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::DatabaseNotFound(path.to_owned()));
        }

        let uri = format!("file:{}?immutable=1", uri_escape(path));
        let conn = Connection::open_with_flags(
            &uri,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| Error::DatabaseOpen {
            path: path.to_owned(),
            source: e,
        })?;

        debug!("Opened store database at {} (read-only)", path.display());
        Ok(Self { conn })
    }

    /// Create an in-memory database initialised with the store schema.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA_SQL)?;
        debug!("Created in-memory store database");
        Ok(Self { conn })
    }

    /// Check if the database has the `ValidPaths` table.
    pub fn has_schema(&self) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='ValidPaths'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

/// Escape the characters SQLite's URI parser treats specially in the path
/// component.
fn uri_escape(path: &Path) -> String {
    let mut escaped = String::new();
    for c in path.to_string_lossy().chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '?' => escaped.push_str("%3F"),
            '#' => escaped.push_str("%23"),
            c => escaped.push(c),
        }
    }
    escaped
}
