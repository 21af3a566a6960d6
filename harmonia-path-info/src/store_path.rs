// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Store path and store directory types.
//!
//! A [`StorePath`] is the base name of a store entry,
//! `<32-char nix-base32 hash>-<name>`. Equality and ordering follow that
//! canonical string. The printable form joins it with a [`StoreDir`].

use std::fmt;

use thiserror::Error;

/// The 32-character alphabet used by Nix's base32 encoding.
pub const NIX_BASE32_ALPHABET: &str = "0123456789abcdfghijklmnpqrsvwxyz";

/// Length of the hash part of a store path.
pub const HASH_PART_LEN: usize = 32;

/// Longest permitted name part.
pub const MAX_NAME_LEN: usize = 211;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorePathError {
    #[error("path '{path}' is not in the Nix store '{store_dir}'")]
    NotInStore { path: String, store_dir: String },

    #[error("store path '{0}' is too short")]
    TooShort(String),

    #[error("store path '{path}' contains illegal base-32 character {c:?}")]
    InvalidHashPart { path: String, c: char },

    #[error("store path '{0}' has no '-' after its hash part")]
    MissingSeparator(String),

    #[error("store path '{path}' has an invalid name: {reason}")]
    InvalidName { path: String, reason: String },

    #[error("store directory '{0}' is not an absolute path")]
    RelativeStoreDir(String),
}

/// A validated store path base name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorePath(String);

impl StorePath {
    /// Parse a base name such as `aaaa…aaaa-hello-2.12`.
    pub fn from_base_path(base: &str) -> Result<Self, StorePathError> {
        if base.len() < HASH_PART_LEN + 2 {
            return Err(StorePathError::TooShort(base.to_owned()));
        }
        if let Some(c) = base
            .chars()
            .take(HASH_PART_LEN)
            .find(|c| !NIX_BASE32_ALPHABET.contains(*c))
        {
            return Err(StorePathError::InvalidHashPart {
                path: base.to_owned(),
                c,
            });
        }
        // The hash part is ASCII, so byte HASH_PART_LEN is a char boundary.
        let rest = &base[HASH_PART_LEN..];
        let Some(name) = rest.strip_prefix('-') else {
            return Err(StorePathError::MissingSeparator(base.to_owned()));
        };
        validate_name(base, name)?;
        Ok(Self(base.to_owned()))
    }

    /// The 32-character hash part.
    pub fn hash_part(&self) -> &str {
        &self.0[..HASH_PART_LEN]
    }

    /// The name following the hash part.
    pub fn name(&self) -> &str {
        &self.0[HASH_PART_LEN + 1..]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_name(path: &str, name: &str) -> Result<(), StorePathError> {
    let invalid = |reason: String| StorePathError::InvalidName {
        path: path.to_owned(),
        reason,
    };
    if name.len() > MAX_NAME_LEN {
        return Err(invalid(format!("longer than {MAX_NAME_LEN} characters")));
    }
    if name.starts_with('.') {
        return Err(invalid("starts with a period".into()));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "+-._?=".contains(*c)))
    {
        return Err(invalid(format!("illegal character {c:?}")));
    }
    Ok(())
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The directory store paths live in, e.g. `/nix/store`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDir(String);

impl Default for StoreDir {
    fn default() -> Self {
        Self("/nix/store".into())
    }
}

impl StoreDir {
    pub fn new(dir: impl Into<String>) -> Result<Self, StorePathError> {
        let dir = dir.into();
        if !dir.starts_with('/') {
            return Err(StorePathError::RelativeStoreDir(dir));
        }
        let trimmed = dir.trim_end_matches('/');
        if trimmed.is_empty() {
            return Ok(Self("/".into()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full path of `path` inside this store directory.
    pub fn display_path(&self, path: &StorePath) -> String {
        if self.0 == "/" {
            format!("/{path}")
        } else {
            format!("{}/{}", self.0, path)
        }
    }

    /// Parse a full store path such as `/nix/store/<hash>-<name>`.
    pub fn parse_path(&self, path: &str) -> Result<StorePath, StorePathError> {
        let base = self.strip_store_dir(path)?;
        if base.contains('/') {
            return Err(StorePathError::InvalidName {
                path: path.to_owned(),
                reason: "contains '/'".into(),
            });
        }
        StorePath::from_base_path(base)
    }

    /// Resolve a command-line argument to a store path.
    ///
    /// Accepts a full store path, a path below one
    /// (`/nix/store/<hash>-<name>/bin/hello`) or a bare base name.
    pub fn follow_path(&self, arg: &str) -> Result<StorePath, StorePathError> {
        if !arg.starts_with('/') {
            return StorePath::from_base_path(arg.trim_end_matches('/'));
        }
        let rest = self.strip_store_dir(arg)?;
        let base = rest.split('/').next().unwrap_or_default();
        StorePath::from_base_path(base)
    }

    fn strip_store_dir<'a>(&self, path: &'a str) -> Result<&'a str, StorePathError> {
        let prefix = if self.0 == "/" { "" } else { self.0.as_str() };
        path.strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
            .ok_or_else(|| StorePathError::NotInStore {
                path: path.to_owned(),
                store_dir: self.0.clone(),
            })
    }
}

impl fmt::Display for StoreDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod unittests {
    use rstest::rstest;

    use super::*;

    const HELLO: &str = "7rjj86a15146cq1d3qy068lml7n8ykzm-hello-2.12.1";

    #[test]
    fn test_parse_full_path() {
        let dir = StoreDir::default();
        let path = dir.parse_path(&format!("/nix/store/{HELLO}")).unwrap();
        assert_eq!(path.hash_part(), "7rjj86a15146cq1d3qy068lml7n8ykzm");
        assert_eq!(path.name(), "hello-2.12.1");
        assert_eq!(dir.display_path(&path), format!("/nix/store/{HELLO}"));
    }

    #[rstest]
    #[case::base_name(HELLO)]
    #[case::full(&format!("/nix/store/{HELLO}"))]
    #[case::trailing_slash(&format!("/nix/store/{HELLO}/"))]
    #[case::inside(&format!("/nix/store/{HELLO}/bin/hello"))]
    fn test_follow_path(#[case] arg: &str) {
        let path = StoreDir::default().follow_path(arg).unwrap();
        assert_eq!(path.as_str(), HELLO);
    }

    #[test]
    fn test_custom_store_dir() {
        let dir = StoreDir::new("/tmp/store/").unwrap();
        assert_eq!(dir.as_str(), "/tmp/store");
        let path = dir.parse_path(&format!("/tmp/store/{HELLO}")).unwrap();
        assert_eq!(dir.display_path(&path), format!("/tmp/store/{HELLO}"));
        assert!(matches!(
            dir.parse_path(&format!("/nix/store/{HELLO}")),
            Err(StorePathError::NotInStore { .. })
        ));
    }

    #[test]
    fn test_relative_store_dir() {
        assert_eq!(
            StoreDir::new("nix/store"),
            Err(StorePathError::RelativeStoreDir("nix/store".into()))
        );
    }

    #[rstest]
    #[case::too_short("7rjj86a15146cq1d3qy068lml7n8ykzm")]
    #[case::bad_hash_char("erjj86a15146cq1d3qy068lml7n8ykzm-hello")]
    #[case::missing_dash("7rjj86a15146cq1d3qy068lml7n8ykzm_hello")]
    #[case::bad_name_char("7rjj86a15146cq1d3qy068lml7n8ykzm-hel lo")]
    #[case::leading_period("7rjj86a15146cq1d3qy068lml7n8ykzm-.hello")]
    #[case::non_ascii_hash(&format!("a{}", "é".repeat(17)))]
    #[case::non_ascii_after_hash("7rjj86a15146cq1d3qy068lml7n8ykzmé-hello")]
    fn test_invalid_base_path(#[case] base: &str) {
        StorePath::from_base_path(base).unwrap_err();
    }

    #[test]
    fn test_follow_non_ascii_argument() {
        let err = StoreDir::default()
            .follow_path(&format!("a{}", "é".repeat(17)))
            .unwrap_err();
        assert!(matches!(err, StorePathError::InvalidHashPart { c: 'é', .. }));
    }

    #[test]
    fn test_nested_path_is_not_a_store_path() {
        let dir = StoreDir::default();
        let err = dir
            .parse_path(&format!("/nix/store/{HELLO}/bin/hello"))
            .unwrap_err();
        assert!(matches!(err, StorePathError::InvalidName { .. }));
    }

    #[test]
    fn test_ordering_follows_canonical_string() {
        let a = StorePath::from_base_path(&format!("{}-z", "0".repeat(32))).unwrap();
        let b = StorePath::from_base_path(&format!("{}-a", "1".repeat(32))).unwrap();
        assert!(a < b);
    }
}
