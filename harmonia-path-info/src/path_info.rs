// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Per-path metadata as reported by the store.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use data_encoding::{BASE64, BitOrder, Encoding, HEXLOWER_PERMISSIVE, Specification};
use derive_more::Display;

use crate::store_path::{NIX_BASE32_ALPHABET, StorePath};

/// A content address assertion, kept in its rendered form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct ContentAddress(String);

impl From<String> for ContentAddress {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Snapshot of one valid store path at query time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathInfo {
    pub path: StorePath,
    /// NAR hash in the form the store keeps it, `<algo>:<digest>`
    pub nar_hash: String,
    pub nar_size: u64,
    pub references: BTreeSet<StorePath>,
    pub deriver: Option<StorePath>,
    /// Unix timestamp, 0 when unknown
    pub registration_time: u64,
    pub ultimate: bool,
    /// Signatures in storage order, duplicates kept
    pub signatures: Vec<String>,
    pub ca: Option<ContentAddress>,
}

/// How NAR hashes are rendered in JSON output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashFormat {
    /// `sha256-<base64>`
    #[default]
    Sri,
    /// Whatever the store holds
    Stored,
}

static NIX_BASE32: LazyLock<Encoding> = LazyLock::new(|| {
    let mut spec = Specification::new();
    spec.symbols.push_str(NIX_BASE32_ALPHABET);
    spec.bit_order = BitOrder::LeastSignificantFirst;
    spec.encoding()
        .expect("nix base32 specification is valid")
});

fn digest_len(algo: &str) -> Option<usize> {
    match algo {
        "md5" => Some(16),
        "sha1" => Some(20),
        "sha256" => Some(32),
        "sha512" => Some(64),
        _ => None,
    }
}

fn decode_digest(algo: &str, digest: &str) -> Option<Vec<u8>> {
    let len = digest_len(algo)?;
    let bytes = if digest.len() == len * 2 {
        HEXLOWER_PERMISSIVE.decode(digest.as_bytes()).ok()?
    } else if digest.len() == (8 * len).div_ceil(5) {
        let mut reversed = digest.as_bytes().to_vec();
        reversed.reverse();
        NIX_BASE32.decode(&reversed).ok()?
    } else {
        BASE64.decode(digest.as_bytes()).ok()?
    };
    (bytes.len() == len).then_some(bytes)
}

/// Render a stored NAR hash.
///
/// `<algo>:<base16>`, `<algo>:<nix-base32>` and `<algo>:<base64>` are
/// converted to SRI. Hashes already in SRI form, or that cannot be decoded,
/// are returned unchanged.
pub fn render_nar_hash(hash: &str, format: HashFormat) -> String {
    if format == HashFormat::Stored {
        return hash.to_owned();
    }
    let Some((algo, digest)) = hash.split_once(':') else {
        return hash.to_owned();
    };
    match decode_digest(algo, digest) {
        Some(bytes) => format!("{algo}-{}", BASE64.encode(&bytes)),
        None => hash.to_owned(),
    }
}
