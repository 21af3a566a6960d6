// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! SQLite access to the Nix store database.
//!
//! This crate reads the `ValidPaths` and `Refs` tables of a Nix store
//! database: per-path metadata (NAR size, hash, signatures, content address)
//! and the reference graph, including the transitive closure of a path.
//!
//! The system database is always opened read-only. An in-memory database
//! with the same schema, plus a small set of registration helpers, exists so
//! that callers can build fixture stores in tests.
//!
//! # Example
//!
//! ```ignore
//! use harmonia_store_db::StoreDb;
//!
//! let db = StoreDb::open_read_only(harmonia_store_db::SYSTEM_DB_PATH)?;
//! if let Some(info) = db.query_path_info("/nix/store/...")? {
//!     println!("NAR size: {}", info.nar_size.unwrap_or(0));
//! }
//! let closure = db.query_closure("/nix/store/...")?;
//! ```

mod connection;
mod error;
mod query;
mod schema;
mod types;
mod write;

pub use connection::{SYSTEM_DB_PATH, StoreDb};
pub use error::{Error, Result};
pub use types::ValidPathInfo;
pub use write::RegisterPathParams;
