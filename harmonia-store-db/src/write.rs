// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Path registration, used to build fixture stores in tests.

use std::collections::BTreeSet;

use rusqlite::params;

use crate::connection::StoreDb;
use crate::error::Result;

/// Parameters for registering a new valid path.
#[derive(Debug, Clone, Default)]
pub struct RegisterPathParams {
    /// Full store path
    pub path: String,
    /// NAR hash, `<algo>:<digest>`
    pub hash: String,
    /// Registration time as a Unix timestamp
    pub registration_time: i64,
    /// Derivation that produced this (if any)
    pub deriver: Option<String>,
    /// NAR size in bytes
    pub nar_size: Option<u64>,
    /// Whether built locally (not substituted)
    pub ultimate: bool,
    /// Space-separated signatures
    pub sigs: Option<String>,
    /// Content address (if content-addressed)
    pub ca: Option<String>,
    /// Paths this references; unknown references are skipped
    pub references: BTreeSet<String>,
}

impl StoreDb {
    /// Register a new valid path and its references.
    ///
    /// Returns the database ID of the new path.
    pub fn register_valid_path(&mut self, params: &RegisterPathParams) -> Result<i64> {
        let tx = self.conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO ValidPaths (path, hash, registrationTime, deriver, narSize, ultimate, sigs, ca)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                params.path,
                params.hash,
                params.registration_time,
                params.deriver,
                params.nar_size.map(|n| n as i64),
                params.ultimate as i32,
                params.sigs,
                params.ca,
            ],
        )?;
        let id = tx.last_insert_rowid();

        for reference in &params.references {
            tx.execute(
                r#"
                INSERT OR REPLACE INTO Refs (referrer, reference)
                SELECT ?1, id FROM ValidPaths WHERE path = ?2
                "#,
                params![id, reference],
            )?;
        }

        tx.commit()?;
        Ok(id)
    }

    /// Add a reference from one path to another.
    ///
    /// Both paths must already exist in the database; otherwise nothing is
    /// inserted.
    pub fn add_reference(&self, referrer_path: &str, reference_path: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO Refs (referrer, reference)
            SELECT r.id, f.id
            FROM ValidPaths r, ValidPaths f
            WHERE r.path = ?1 AND f.path = ?2
            "#,
            params![referrer_path, reference_path],
        )?;
        Ok(())
    }
}
