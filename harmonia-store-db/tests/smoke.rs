// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

//! Smoke tests for harmonia-store-db against an in-memory database.

use std::collections::BTreeSet;

use harmonia_store_db::{RegisterPathParams, StoreDb};
use rstest::rstest;

fn make_path(hash: &str, name: &str) -> String {
    format!("/nix/store/{hash}-{name}")
}

fn register(db: &mut StoreDb, path: &str, nar_size: u64, references: &[&str]) {
    db.register_valid_path(&RegisterPathParams {
        path: path.to_owned(),
        hash: format!("sha256:{}", "0".repeat(64)),
        nar_size: Some(nar_size),
        references: references.iter().map(|r| r.to_string()).collect(),
        ..Default::default()
    })
    .unwrap();
}

/// app -> lib -> glibc, app -> glibc
fn diamond() -> (StoreDb, String, String, String) {
    let mut db = StoreDb::open_memory().unwrap();
    let glibc = make_path("gggggggggggggggggggggggggggggggg", "glibc");
    let lib = make_path("llllllllllllllllllllllllllllllll", "mylib");
    let app = make_path("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "myapp");
    register(&mut db, &glibc, 1000, &[]);
    register(&mut db, &lib, 200, &[&glibc]);
    register(&mut db, &app, 30, &[&lib, &glibc]);
    (db, app, lib, glibc)
}

#[test]
fn test_schema_creation() {
    let db = StoreDb::open_memory().unwrap();
    assert!(db.has_schema().unwrap());
    assert!(db.query_path_info("/nix/store/nope").unwrap().is_none());
}

#[test]
fn test_path_roundtrip() {
    let mut db = StoreDb::open_memory().unwrap();

    let params = RegisterPathParams {
        path: make_path("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "hello"),
        hash: "sha256:".to_string() + &"0".repeat(64),
        registration_time: 1_700_000_000,
        nar_size: Some(12345),
        ultimate: true,
        sigs: Some("cache.example.com:abc123".into()),
        ca: Some("fixed:r:sha256:1b8m03r63zqhnjf7l5wnldhh7c134ap5vpj0850ymkq1iyzicy5s".into()),
        ..Default::default()
    };

    let id = db.register_valid_path(&params).unwrap();
    assert!(id > 0);

    let info = db.query_path_info(&params.path).unwrap().unwrap();
    assert_eq!(info.path, params.path);
    assert_eq!(info.hash, params.hash);
    assert_eq!(info.nar_size, params.nar_size);
    assert_eq!(info.registration_time, params.registration_time);
    assert_eq!(info.ca, params.ca);
    assert!(info.ultimate);
    assert_eq!(info.signatures(), ["cache.example.com:abc123"]);
    assert!(db.is_valid_path(&params.path).unwrap());
}

#[test]
fn test_references() {
    let (db, app, lib, glibc) = diamond();

    let app_refs = db.query_references(&app).unwrap();
    assert_eq!(app_refs, BTreeSet::from([lib.clone(), glibc.clone()]));

    let info = db.query_path_info(&lib).unwrap().unwrap();
    assert_eq!(info.references, BTreeSet::from([glibc]));
}

#[rstest]
#[case::root(0, 3)]
#[case::middle(1, 2)]
#[case::leaf(2, 1)]
fn test_closure_collapses_shared_nodes(#[case] index: usize, #[case] expected: usize) {
    let (db, app, lib, glibc) = diamond();
    let paths = [app, lib, glibc];
    let closure = db.query_closure(&paths[index]).unwrap();
    assert_eq!(closure.len(), expected);
    assert!(closure.contains(&paths[index]));
    for member in &paths[index..] {
        assert!(closure.contains(member));
    }
}

#[test]
fn test_closure_with_self_reference_and_cycle() {
    let mut db = StoreDb::open_memory().unwrap();
    let a = make_path("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "a");
    let b = make_path("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb", "b");
    register(&mut db, &a, 1, &[]);
    register(&mut db, &b, 1, &[&a]);
    db.add_reference(&a, &a).unwrap();
    db.add_reference(&a, &b).unwrap();

    assert_eq!(db.query_closure(&a).unwrap(), BTreeSet::from([a, b]));
}

#[test]
fn test_closure_of_unknown_path_is_empty() {
    let (db, ..) = diamond();
    let unknown = make_path("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz", "unknown");
    assert!(db.query_closure(&unknown).unwrap().is_empty());
}

#[test]
fn test_unknown_references_are_skipped() {
    let mut db = StoreDb::open_memory().unwrap();
    let a = make_path("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "a");
    let ghost = make_path("gggggggggggggggggggggggggggggggg", "ghost");
    register(&mut db, &a, 1, &[&ghost]);

    assert!(db.query_references(&a).unwrap().is_empty());
}
