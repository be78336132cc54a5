//! Tests for pluggable codecs
//!
//! These tests verify:
//! - JSON codec output and factory-based decoding
//! - A non-JSON codec drives the whole store lifecycle

use std::fs;

use jotdb::{Codec, JsonCodec, Store};
use tempfile::TempDir;

use crate::{journal_path, snapshot, temp_config, Item, PipeCodec};

#[test]
fn test_json_codec_encode() {
    let bytes = Codec::<Item>::encode(&JsonCodec, &Item::new(3, "c")).unwrap();
    assert_eq!(bytes, br#"{"id":3,"value":"c"}"#.to_vec());
}

#[test]
fn test_json_codec_decode_missing_id() {
    let item: Item = Codec::<Item>::decode(&JsonCodec, br#"{"value":"x"}"#).unwrap();
    assert_eq!(item, Item::new(0, "x"));
}

#[test]
fn test_json_codec_decode_garbage() {
    let result: jotdb::Result<Item> = Codec::<Item>::decode(&JsonCodec, b"{not json");
    assert!(result.is_err());
}

#[test]
fn test_json_codec_escapes_newlines() {
    let bytes = Codec::<Item>::encode(&JsonCodec, &Item::new(1, "two\nlines")).unwrap();
    assert!(!bytes.contains(&b'\n'));
}

#[test]
fn test_store_with_custom_codec() {
    let temp_dir = TempDir::new().unwrap();

    let mut store: Store<Item, PipeCodec> = Store::open(temp_config(&temp_dir), PipeCodec).unwrap();
    store.add(Item::value("a")).unwrap();
    store.add(Item::value("b")).unwrap();
    store.update(Item::new(2, "B")).unwrap();
    drop(store);

    assert_eq!(
        fs::read_to_string(journal_path(&temp_dir)).unwrap(),
        "a:1|a\na:2|b\nu:2|B\n"
    );

    let mut store: Store<Item, PipeCodec> = Store::open(temp_config(&temp_dir), PipeCodec).unwrap();
    assert_eq!(
        snapshot(&store),
        vec![(1, "a".to_string()), (2, "B".to_string())]
    );
    store.close().unwrap();

    assert_eq!(
        fs::read_to_string(journal_path(&temp_dir)).unwrap(),
        "a:1|a\na:2|B\n"
    );
}
