// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Read query operations for the store database.

use std::collections::BTreeSet;

use rusqlite::{OptionalExtension, params};
use tracing::trace;

use crate::connection::StoreDb;
use crate::error::{Error, Result};
use crate::types::ValidPathInfo;

impl StoreDb {
    /// Query path info by full store path.
    ///
    /// Returns `None` if the path is not in the database.
    pub fn query_path_info(&self, path: &str) -> Result<Option<ValidPathInfo>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT id, path, hash, registrationTime, deriver, narSize, ultimate, sigs, ca
            FROM ValidPaths
            WHERE path = ?1
            "#,
        )?;

        let row = stmt
            .query_row(params![path], |row| {
                Ok((
                    ValidPathInfo {
                        id: row.get(0)?,
                        path: row.get(1)?,
                        hash: row.get(2)?,
                        registration_time: row.get(3)?,
                        deriver: row.get(4)?,
                        nar_size: None,
                        ultimate: row.get::<_, Option<i32>>(6)?.unwrap_or(0) != 0,
                        sigs: row.get(7)?,
                        ca: row.get(8)?,
                        references: BTreeSet::new(),
                    },
                    row.get::<_, Option<i64>>(5)?,
                ))
            })
            .optional()?;

        let Some((mut info, nar_size)) = row else {
            trace!("{path} is not a valid path");
            return Ok(None);
        };
        info.nar_size = nar_size
            .map(|n| {
                u64::try_from(n).map_err(|_| Error::InvalidRow {
                    path: path.to_owned(),
                    reason: format!("negative narSize {n}"),
                })
            })
            .transpose()?;
        info.references = self.query_references_by_id(info.id)?;
        Ok(Some(info))
    }

    /// Check if a store path is valid (exists in the database).
    pub fn is_valid_path(&self, path: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT 1 FROM ValidPaths WHERE path = ?1 LIMIT 1")?;
        Ok(stmt.exists(params![path])?)
    }

    /// Get all paths referenced by a given path.
    pub fn query_references(&self, path: &str) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT v.path
            FROM Refs r
            JOIN ValidPaths v ON r.reference = v.id
            WHERE r.referrer = (SELECT id FROM ValidPaths WHERE path = ?1)
            "#,
        )?;

        let refs = stmt
            .query_map(params![path], |row| row.get(0))?
            .collect::<rusqlite::Result<BTreeSet<String>>>()?;
        Ok(refs)
    }

    fn query_references_by_id(&self, id: i64) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT v.path
            FROM Refs r
            JOIN ValidPaths v ON r.reference = v.id
            WHERE r.referrer = ?1
            "#,
        )?;

        let refs = stmt
            .query_map(params![id], |row| row.get(0))?
            .collect::<rusqlite::Result<BTreeSet<String>>>()?;
        Ok(refs)
    }

    /// Compute the transitive closure of a path over `Refs`.
    ///
    /// The result includes `path` itself. Shared dependencies and reference
    /// cycles (including self-references) appear once. An unknown path has
    /// an empty closure.
    pub fn query_closure(&self, path: &str) -> Result<BTreeSet<String>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            WITH RECURSIVE closure(id) AS (
                SELECT id FROM ValidPaths WHERE path = ?1
                UNION
                SELECT r.reference FROM Refs r JOIN closure c ON r.referrer = c.id
            )
            SELECT v.path FROM closure c JOIN ValidPaths v ON v.id = c.id
            "#,
        )?;

        let closure = stmt
            .query_map(params![path], |row| row.get(0))?
            .collect::<rusqlite::Result<BTreeSet<String>>>()?;
        trace!("closure of {path} has {} members", closure.len());
        Ok(closure)
    }
}
