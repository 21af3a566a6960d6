// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Report metadata of Nix store paths.
//!
//! Given a list of store paths this crate gathers their NAR sizes, closure
//! sizes, signatures and substitutability, and renders them either as
//! aligned text or as a JSON array. The store is reached through the
//! [`store::PathInfoStore`] trait; [`local::LocalStore`] implements it on
//! top of the local SQLite database and local binary caches.

pub mod closure;
pub mod config;
pub mod error;
pub mod local;
pub mod path_info;
pub mod report;
pub mod size;
pub mod store;
pub mod store_path;
pub mod substitutable;

#[cfg(test)]
mod tests;
