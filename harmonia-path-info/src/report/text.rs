// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Aligned, tab-separated text output.

use futures::future::try_join_all;

use super::{ReportOptions, Row, fetch_row};
use crate::error::{PathInfoError, Result};
use crate::path_info::PathInfo;
use crate::size::format_size;
use crate::store::PathInfoStore;
use crate::store_path::StorePath;

/// One line per path, in the order given. Every path must be valid.
pub async fn render<S: PathInfoStore>(
    store: &S,
    paths: &[StorePath],
    options: &ReportOptions,
) -> Result<String> {
    let rows = try_join_all(paths.iter().map(|path| async move {
        fetch_row(store, path, options.show_closure_size)
            .await?
            .ok_or_else(|| PathInfoError::not_found(store.print_store_path(path)))
    }))
    .await?;

    let lines: Vec<(String, Row)> = paths
        .iter()
        .zip(rows)
        .map(|(path, row)| (store.print_store_path(path), row))
        .collect();
    Ok(render_lines(&lines, options))
}

/// Render already gathered rows, keyed by their printed path.
///
/// The path column is padded to the longest printed path among `lines`
/// when any further column follows.
pub fn render_lines(lines: &[(String, Row)], options: &ReportOptions) -> String {
    let width = lines.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (name, row) in lines {
        out.push_str(name);
        if options.has_columns() {
            out.push_str(&" ".repeat(width - name.len()));
        }
        if options.show_size {
            out.push('\t');
            out.push_str(&format_size(row.info.nar_size, options.human_readable));
        }
        if options.show_closure_size {
            out.push('\t');
            out.push_str(&format_size(
                row.closure_size.unwrap_or_default(),
                options.human_readable,
            ));
        }
        if options.show_sigs {
            out.push('\t');
            out.push_str(&sigs_column(&row.info));
        }
        out.push('\n');
    }
    out
}

/// `ultimate`, `ca:<content address>` and the signatures, space-separated.
pub fn sigs_column(info: &PathInfo) -> String {
    let mut fields = Vec::with_capacity(info.signatures.len() + 2);
    if info.ultimate {
        fields.push("ultimate".to_owned());
    }
    if let Some(ca) = &info.ca {
        fields.push(format!("ca:{ca}"));
    }
    fields.extend(info.signatures.iter().cloned());
    fields.join(" ")
}
