//! Tests for Journal Reader
//!
//! These tests verify:
//! - Sequential line reading with 1-based numbering
//! - Newline stripping (`\n` and `\r\n`)
//! - A final line without a newline
//! - Invalid UTF-8 reporting

use std::fs;

use jotdb::journal::JournalReader;
use jotdb::JotError;

use crate::{setup_temp_journal, write_journal};

#[test]
fn test_read_empty_file() {
    let (_temp, path) = setup_temp_journal();
    write_journal(&path, "");

    let mut reader = JournalReader::open(&path).unwrap();
    assert!(reader.next_line().unwrap().is_none());
    assert_eq!(reader.line_number(), 0);
}

#[test]
fn test_read_lines_in_order() {
    let (_temp, path) = setup_temp_journal();
    write_journal(&path, "a:1\nu:2\nd:3\n");

    let lines: Vec<(u64, String)> = JournalReader::open(&path)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(
        lines,
        vec![
            (1, "a:1".to_string()),
            (2, "u:2".to_string()),
            (3, "d:3".to_string()),
        ]
    );
}

#[test]
fn test_read_strips_crlf() {
    let (_temp, path) = setup_temp_journal();
    write_journal(&path, "a:1\r\na:2\n");

    let mut reader = JournalReader::open(&path).unwrap();
    assert_eq!(reader.next_line().unwrap(), Some((1, "a:1".to_string())));
    assert_eq!(reader.next_line().unwrap(), Some((2, "a:2".to_string())));
    assert_eq!(reader.next_line().unwrap(), None);
}

#[test]
fn test_read_last_line_without_newline() {
    let (_temp, path) = setup_temp_journal();
    write_journal(&path, "a:1\na:2");

    let mut reader = JournalReader::open(&path).unwrap();
    reader.next_line().unwrap();
    assert_eq!(reader.next_line().unwrap(), Some((2, "a:2".to_string())));
    assert_eq!(reader.next_line().unwrap(), None);
}

#[test]
fn test_read_invalid_utf8() {
    let (_temp, path) = setup_temp_journal();
    fs::write(&path, b"a:1\na:\xff\xfe\na:3\n").unwrap();

    let mut reader = JournalReader::open(&path).unwrap();
    reader.next_line().unwrap();

    let err = reader.next_line().unwrap_err();
    assert!(matches!(err, JotError::MalformedEntry { line: 2, .. }));

    // The reader moves past the bad line
    assert_eq!(reader.next_line().unwrap(), Some((3, "a:3".to_string())));
}

#[test]
fn test_open_missing_file() {
    let (_temp, path) = setup_temp_journal();
    assert!(JournalReader::open(&path).is_err());
}
