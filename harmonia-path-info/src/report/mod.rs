// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Path-info reports.
//!
//! One [`ReportOptions`] drives two renderers. Both read rows gathered by
//! [`fetch_row`]; they differ in how substitutability is applied:
//!
//! - text output drops substitutable paths and lists what is missing,
//! - JSON output keeps every requested path and adds a `substitutable` flag.

pub mod json;
pub mod text;

use tracing::debug;

use crate::closure::closure_size;
use crate::error::Result;
use crate::path_info::{HashFormat, PathInfo};
use crate::store::PathInfoStore;
use crate::store_path::StorePath;
use crate::substitutable::query_partition;

/// What a report contains and how it is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// NAR size of each path
    pub show_size: bool,
    /// NAR size of each path's closure
    pub show_closure_size: bool,
    /// Scaled sizes with a unit suffix
    pub human_readable: bool,
    /// Ultimate flag, content address and signatures
    pub show_sigs: bool,
    /// Query substituters; text drops substitutable paths, JSON annotates
    pub show_sub_status: bool,
    /// JSON document instead of aligned text
    pub json: bool,
    /// NAR hash rendering in JSON output
    pub hash_format: HashFormat,
}

impl ReportOptions {
    /// Whether text lines carry any column after the path.
    pub fn has_columns(&self) -> bool {
        self.show_size || self.show_closure_size || self.show_sigs
    }
}

/// Metadata gathered for one reported path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub info: PathInfo,
    pub closure_size: Option<u64>,
}

/// Gather the row for `path`, or `None` if the path is not valid.
pub async fn fetch_row<S: PathInfoStore>(
    store: &S,
    path: &StorePath,
    with_closure_size: bool,
) -> Result<Option<Row>> {
    let Some(info) = store.query_path_info(path).await? else {
        return Ok(None);
    };
    let closure_size = if with_closure_size {
        Some(closure_size(store, path).await?)
    } else {
        None
    };
    Ok(Some(Row { info, closure_size }))
}

/// Render a report for `paths`.
///
/// Nothing is returned unless every path was rendered; any store error
/// aborts the whole report.
pub async fn report<S: PathInfoStore>(
    store: &S,
    paths: &[StorePath],
    options: &ReportOptions,
) -> Result<String> {
    let partition = if options.show_sub_status {
        Some(query_partition(store, paths).await?)
    } else {
        None
    };

    if options.json {
        let mut records =
            json::path_info_to_json(store, paths, options.show_closure_size, options.hash_format)
                .await?;
        if let Some(partition) = &partition {
            for (record, path) in records.iter_mut().zip(paths) {
                record.substitutable = Some(partition.is_substitutable(path));
            }
        }
        let mut doc = serde_json::to_string(&records)?;
        doc.push('\n');
        Ok(doc)
    } else {
        let paths = match &partition {
            Some(partition) => {
                debug!("reporting {} missing paths", partition.missing.len());
                partition.missing.as_slice()
            }
            None => paths,
        };
        text::render(store, paths, options).await
    }
}
