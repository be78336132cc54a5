//! Store test suite
//!
//! Shared record type, codecs and helpers for the store tests.

mod codec_tests;

use std::path::PathBuf;

use jotdb::{Codec, Config, JotError, JournalSyncStrategy, JsonCodec, Record, RecordId, Store};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub value: String,
}

impl Item {
    pub fn new(id: RecordId, value: &str) -> Self {
        Self {
            id,
            value: value.to_string(),
        }
    }

    pub fn value(value: &str) -> Self {
        Self::new(0, value)
    }
}

impl Record for Item {
    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }
}

/// Plain `id|value` text encoding
pub struct PipeCodec;

impl Codec<Item> for PipeCodec {
    fn encode(&self, record: &Item) -> jotdb::Result<Vec<u8>> {
        Ok(format!("{}|{}", record.id, record.value).into_bytes())
    }

    fn decode_into(&self, payload: &[u8], record: &mut Item) -> jotdb::Result<()> {
        let text = std::str::from_utf8(payload).map_err(|e| JotError::Serialization(e.to_string()))?;
        let (id, value) = text
            .split_once('|')
            .ok_or_else(|| JotError::Serialization(format!("no '|' in {:?}", text)))?;
        record.id = id.parse().map_err(|_| JotError::Serialization(format!("bad id {:?}", id)))?;
        record.value = value.to_string();
        Ok(())
    }
}

/// JSON codec that refuses to encode records whose value is "poison"
pub struct PoisonCodec;

impl Codec<Item> for PoisonCodec {
    fn encode(&self, record: &Item) -> jotdb::Result<Vec<u8>> {
        if record.value == "poison" {
            return Err(JotError::Serialization("poisoned record".to_string()));
        }
        Codec::<Item>::encode(&JsonCodec, record)
    }

    fn decode_into(&self, payload: &[u8], record: &mut Item) -> jotdb::Result<()> {
        Codec::<Item>::decode_into(&JsonCodec, payload, record)
    }
}

pub fn temp_config(temp_dir: &TempDir) -> Config {
    Config::builder()
        .journal_path(temp_dir.path().join("items.jnl"))
        .sync_strategy(JournalSyncStrategy::EveryWrite)
        .build()
}

pub fn journal_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("items.jnl")
}

pub fn setup_temp_store() -> (TempDir, Store<Item>) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::open(temp_config(&temp_dir), JsonCodec).unwrap();
    (temp_dir, store)
}

pub fn reopen(temp_dir: &TempDir) -> Store<Item> {
    Store::open(temp_config(temp_dir), JsonCodec).unwrap()
}

/// Live records as (id, value) pairs, sorted by id
pub fn snapshot<C: Codec<Item>>(store: &Store<Item, C>) -> Vec<(RecordId, String)> {
    let mut out = Vec::new();
    store.for_each(|item| out.push((item.id, item.value.clone())));
    out.sort();
    out
}
