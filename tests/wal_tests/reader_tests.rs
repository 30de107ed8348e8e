//! Tests for WAL Reader
//!
//! These tests verify:
//! - Missing journals open as `None`
//! - Blank lines are skipped, line numbers stay accurate
//! - Malformed lines decode as `Decoded::Malformed`

use std::fs;

use tempfile::TempDir;
use walstore::wal::{Decoded, WalReader};

use crate::common::Person;

#[test]
fn test_open_missing_file() {
    let temp = TempDir::new().unwrap();
    let reader = WalReader::open(&temp.path().join("absent.wal")).unwrap();
    assert!(reader.is_none());
}

#[test]
fn test_next_line_skips_blank_lines() {
    let temp = TempDir::new().unwrap();
    let wal_path = temp.path().join("test.wal");
    fs::write(&wal_path, "first\n\n   \nsecond\n").unwrap();

    let mut reader = WalReader::open(&wal_path).unwrap().unwrap();

    assert_eq!(reader.next_line().unwrap(), Some((1, b"first".to_vec())));
    assert_eq!(reader.next_line().unwrap(), Some((4, b"second".to_vec())));
    assert_eq!(reader.next_line().unwrap(), None);
}

#[test]
fn test_entries_reports_malformed_line_numbers() {
    let temp = TempDir::new().unwrap();
    let wal_path = temp.path().join("test.wal");
    fs::write(
        &wal_path,
        concat!(
            r#"{"type":0,"id":1,"timestamp":1,"data":{"id":1,"name":"a"}}"#,
            "\n",
            "garbage\n",
            r#"{"type":2,"id":1,"timestamp":2}"#,
            "\n",
        ),
    )
    .unwrap();

    let reader = WalReader::open(&wal_path).unwrap().unwrap();
    let decoded: Vec<Decoded<Person>> = reader.entries().map(|d| d.unwrap()).collect();

    assert_eq!(decoded.len(), 3);
    assert!(matches!(decoded[0], Decoded::Entry(_)));
    assert!(matches!(decoded[1], Decoded::Malformed { line: 2, .. }));
    assert!(matches!(decoded[2], Decoded::Entry(_)));
}

#[test]
fn test_entries_without_trailing_newline() {
    let temp = TempDir::new().unwrap();
    let wal_path = temp.path().join("test.wal");
    fs::write(&wal_path, r#"{"type":2,"id":5,"timestamp":2}"#).unwrap();

    let reader = WalReader::open(&wal_path).unwrap().unwrap();
    let decoded: Vec<Decoded<Person>> = reader.entries().map(|d| d.unwrap()).collect();

    assert_eq!(decoded.len(), 1);
    assert!(matches!(&decoded[0], Decoded::Entry(e) if e.id == 5));
}
