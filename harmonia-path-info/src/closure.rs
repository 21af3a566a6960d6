// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Closure size aggregation.

use std::collections::BTreeSet;

use futures::future::try_join_all;
use tracing::trace;

use crate::error::{PathInfoError, Result};
use crate::store::PathInfoStore;
use crate::store_path::StorePath;

/// Sum NAR sizes over closure members, counting each member once.
///
/// Members may repeat (e.g. when produced by a graph walk that revisits
/// shared nodes); only the first occurrence is added.
pub fn sum_closure<'a, I>(members: I) -> u64
where
    I: IntoIterator<Item = (&'a StorePath, u64)>,
{
    let mut seen = BTreeSet::new();
    members
        .into_iter()
        .filter(|(path, _)| seen.insert(*path))
        .fold(0u64, |total, (_, size)| total.saturating_add(size))
}

async fn nar_size<S: PathInfoStore>(store: &S, path: &StorePath) -> Result<u64> {
    store
        .query_path_info(path)
        .await?
        .map(|info| info.nar_size)
        .ok_or_else(|| PathInfoError::not_found(store.print_store_path(path)))
}

/// Total NAR size of the closure of `path`, `path` included.
///
/// Computed fresh on every call. Fails with `NotFound` naming the first
/// closure member without metadata.
pub async fn closure_size<S: PathInfoStore>(store: &S, path: &StorePath) -> Result<u64> {
    let mut closure = store.query_closure(path).await?;
    closure.insert(path.clone());

    let sizes = try_join_all(closure.iter().map(|member| nar_size(store, member))).await?;
    let total = sum_closure(closure.iter().zip(sizes));
    trace!(
        "closure of {} has {} members, {total} bytes",
        store.print_store_path(path),
        closure.len()
    );
    Ok(total)
}

/// Union of the closures of `paths`, in canonical order.
pub async fn closure_of_all<S: PathInfoStore>(
    store: &S,
    paths: &[StorePath],
) -> Result<Vec<StorePath>> {
    let closures = try_join_all(paths.iter().map(|path| async move {
        let closure = store.query_closure(path).await?;
        if closure.is_empty() {
            return Err(PathInfoError::not_found(store.print_store_path(path)));
        }
        Ok(closure)
    }))
    .await?;
    let all: BTreeSet<StorePath> = closures.into_iter().flatten().collect();
    Ok(all.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn path(i: usize) -> StorePath {
        StorePath::from_base_path(&format!("{}-p{i}", "0".repeat(32))).unwrap()
    }

    #[test]
    fn test_sum_counts_repeats_once() {
        let (a, b) = (path(1), path(2));
        let members = [(&a, 100), (&b, 50), (&a, 100), (&b, 50), (&b, 50)];
        assert_eq!(sum_closure(members), 150);
    }

    #[test]
    fn test_sum_empty() {
        assert_eq!(sum_closure(std::iter::empty()), 0);
    }

    #[test]
    fn test_sum_saturates() {
        let (a, b) = (path(1), path(2));
        assert_eq!(sum_closure([(&a, u64::MAX), (&b, 1)]), u64::MAX);
    }

    proptest! {
        #[test]
        fn sum_is_traversal_order_invariant(
            sizes in proptest::collection::vec(0u64..1 << 40, 1..20),
            visits in proptest::collection::vec(any::<prop::sample::Index>(), 0..60),
            seed in any::<u64>(),
        ) {
            let paths: Vec<StorePath> = (0..sizes.len()).map(path).collect();
            let expected: u64 = sizes.iter().sum();

            // Every member at least once, plus arbitrary revisits.
            let mut walk: Vec<usize> = (0..sizes.len()).collect();
            walk.extend(visits.iter().map(|v| v.index(sizes.len())));
            let len = walk.len();
            for i in 0..len {
                let j = (seed.wrapping_mul(i as u64 + 1) % len as u64) as usize;
                walk.swap(i, j);
            }

            let members = walk.iter().map(|&i| (&paths[i], sizes[i]));
            prop_assert_eq!(sum_closure(members), expected);
        }
    }
}
