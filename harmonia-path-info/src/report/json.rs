// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! JSON output, in the shape of `nix path-info --json`.

use futures::future::try_join_all;
use serde::Serialize;

use super::{Row, fetch_row};
use crate::error::Result;
use crate::path_info::{HashFormat, render_nar_hash};
use crate::store::PathInfoStore;
use crate::store_path::StorePath;

/// One element of the JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathInfoJson {
    pub path: String,
    /// Present, and `false`, only for paths that are not valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(flatten)]
    pub info: Option<ValidPathJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closure_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substitutable: Option<bool>,
}

/// Fields only valid paths have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidPathJson {
    pub nar_hash: String,
    pub nar_size: u64,
    pub references: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deriver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_time: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub ultimate: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub signatures: Vec<String>,
}

impl PathInfoJson {
    fn from_row<S: PathInfoStore>(
        store: &S,
        path: &StorePath,
        row: Option<Row>,
        hash_format: HashFormat,
    ) -> Self {
        let printed = store.print_store_path(path);
        let Some(Row { info, closure_size }) = row else {
            return Self {
                path: printed,
                valid: Some(false),
                info: None,
                closure_size: None,
                substitutable: None,
            };
        };
        Self {
            path: printed,
            valid: None,
            info: Some(ValidPathJson {
                nar_hash: render_nar_hash(&info.nar_hash, hash_format),
                nar_size: info.nar_size,
                references: info
                    .references
                    .iter()
                    .map(|r| store.print_store_path(r))
                    .collect(),
                ca: info.ca.map(|ca| ca.to_string()),
                deriver: info.deriver.map(|d| store.print_store_path(&d)),
                registration_time: (info.registration_time != 0)
                    .then_some(info.registration_time),
                ultimate: info.ultimate,
                signatures: info.signatures,
            }),
            closure_size,
            substitutable: None,
        }
    }
}

/// One record per path, in the order given.
///
/// Paths that are not valid yield `{"path": …, "valid": false}` instead of
/// an error. Closure members without metadata still fail the whole call.
pub async fn path_info_to_json<S: PathInfoStore>(
    store: &S,
    paths: &[StorePath],
    include_closure_size: bool,
    hash_format: HashFormat,
) -> Result<Vec<PathInfoJson>> {
    let rows = try_join_all(
        paths
            .iter()
            .map(|path| fetch_row(store, path, include_closure_size)),
    )
    .await?;
    Ok(paths
        .iter()
        .zip(rows)
        .map(|(path, row)| PathInfoJson::from_row(store, path, row, hash_format))
        .collect())
}
