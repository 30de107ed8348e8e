//! Tests for the snapshot file
//!
//! These tests verify:
//! - Missing, empty and damaged snapshots bootstrap as empty
//! - A damaged snapshot is set aside as `<path>.corrupt`
//! - Writes are pretty-printed JSON arrays that replace the old content
//! - No temp file is left behind

use std::fs;

use tempfile::TempDir;
use walstore::storage::Snapshot;

use crate::common::{person, Person};

fn setup_snapshot() -> (TempDir, Snapshot) {
    let temp_dir = TempDir::new().unwrap();
    let snapshot = Snapshot::new(temp_dir.path().join("people.json"));
    (temp_dir, snapshot)
}

#[test]
fn test_load_missing_snapshot_is_empty() {
    let (_temp, snapshot) = setup_snapshot();

    assert!(snapshot.load::<Person>().is_empty());
    assert!(snapshot.read::<Person>().unwrap().is_empty());
}

#[test]
fn test_load_whitespace_snapshot_is_empty() {
    let (_temp, snapshot) = setup_snapshot();
    fs::write(snapshot.path(), "  \n").unwrap();

    assert!(snapshot.read::<Person>().unwrap().is_empty());
}

#[test]
fn test_load_malformed_snapshot_is_empty() {
    let (_temp, snapshot) = setup_snapshot();
    fs::write(snapshot.path(), "[{\"id\": 1, \"name\"").unwrap();

    assert!(snapshot.read::<Person>().is_err());
    assert!(snapshot.load::<Person>().is_empty());
    assert!(!snapshot.path().exists());
}

#[test]
fn test_load_malformed_snapshot_sets_it_aside() {
    let (_temp, snapshot) = setup_snapshot();
    fs::write(snapshot.path(), "[{\"id\": 1, \"name\"").unwrap();

    assert!(snapshot.load::<Person>().is_empty());

    assert!(!snapshot.path().exists());
    assert_eq!(
        fs::read_to_string(snapshot.corrupt_path()).unwrap(),
        "[{\"id\": 1, \"name\""
    );

    snapshot.write([person(1, "Alice")].iter()).unwrap();
    assert_eq!(
        fs::read_to_string(snapshot.corrupt_path()).unwrap(),
        "[{\"id\": 1, \"name\""
    );
}

#[test]
fn test_load_missing_snapshot_creates_no_corrupt_file() {
    let (_temp, snapshot) = setup_snapshot();

    assert!(snapshot.load::<Person>().is_empty());
    assert!(!snapshot.corrupt_path().exists());
}

#[test]
fn test_load_non_array_snapshot_is_empty() {
    let (_temp, snapshot) = setup_snapshot();
    fs::write(snapshot.path(), "{\"id\": 1}").unwrap();

    assert!(snapshot.load::<Person>().is_empty());
    assert!(snapshot.corrupt_path().exists());
}

#[test]
fn test_write_then_read() {
    let (_temp, snapshot) = setup_snapshot();
    let people = vec![person(1, "Alice"), person(2, "Bob")];

    let written = snapshot.write(people.iter()).unwrap();

    assert_eq!(written, 2);
    assert_eq!(snapshot.read::<Person>().unwrap(), people);
}

#[test]
fn test_write_is_pretty_printed_array() {
    let (_temp, snapshot) = setup_snapshot();

    snapshot.write([person(1, "Alice")].iter()).unwrap();

    let text = fs::read_to_string(snapshot.path()).unwrap();
    assert!(text.starts_with('['));
    assert!(text.contains("\n  {"));
    assert!(text.contains("\"name\": \"Alice\""));
}

#[test]
fn test_write_empty_collection() {
    let (_temp, snapshot) = setup_snapshot();
    snapshot.write([person(1, "Alice")].iter()).unwrap();

    let written = snapshot.write(Vec::<Person>::new().iter()).unwrap();

    assert_eq!(written, 0);
    assert_eq!(fs::read_to_string(snapshot.path()).unwrap().trim(), "[]");
}

#[test]
fn test_write_replaces_and_leaves_no_temp_file() {
    let (temp, snapshot) = setup_snapshot();

    snapshot.write([person(1, "a"), person(2, "b")].iter()).unwrap();
    snapshot.write([person(3, "c")].iter()).unwrap();

    assert_eq!(snapshot.read::<Person>().unwrap(), vec![person(3, "c")]);
    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["people.json".to_string()]);
}
