//! Record index implementation
//!
//! BTreeMap-based map from identifier to record, owning the id allocator.

use std::collections::btree_map::{self, BTreeMap};

use super::IdAllocator;
use crate::error::Result;
use crate::journal::Action;
use crate::record::{Record, RecordId};

/// In-memory table of live records
#[derive(Debug)]
pub struct RecordIndex<R> {
    records: BTreeMap<RecordId, R>,
    allocator: IdAllocator,
}

impl<R: Record> RecordIndex<R> {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            allocator: IdAllocator::new(),
        }
    }

    /// Get a record by identifier
    pub fn get(&self, id: RecordId) -> Option<&R> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Reserve a fresh identifier for a record about to be added
    pub fn allocate(&mut self) -> Result<RecordId> {
        self.allocator.allocate()
    }

    /// Resolve a record's identifier through the allocator and store it
    ///
    /// Unassigned records get the next free id; assigned ones push the
    /// allocator past their id. Replaces any record with the same id.
    /// Returns the id it was stored under. Fails without inserting if an
    /// unassigned record arrives after the id space is exhausted.
    pub fn upsert(&mut self, mut record: R) -> Result<RecordId> {
        let id = self.allocator.observe(record.id())?;
        record.set_id(id);
        self.records.insert(id, record);
        Ok(id)
    }

    /// Remove a record, returning it if it was present
    pub fn remove(&mut self, id: RecordId) -> Option<R> {
        self.records.remove(&id)
    }

    /// Apply one replayed journal entry
    ///
    /// Add and update are both upserts; delete of an absent id is a no-op.
    pub fn apply(&mut self, action: Action, record: R) -> Result<RecordId> {
        match action {
            Action::Add | Action::Update => self.upsert(record),
            Action::Delete => {
                let id = record.id();
                self.records.remove(&id);
                Ok(id)
            }
        }
    }

    /// Iterate over live records in ascending id order
    pub fn iter(&self) -> btree_map::Values<'_, RecordId, R> {
        self.records.values()
    }

    /// Identifier the next `allocate` will return
    pub fn next_id(&self) -> RecordId {
        self.allocator.next_id()
    }

    pub fn ids_exhausted(&self) -> bool {
        self.allocator.is_exhausted()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Record> Default for RecordIndex<R> {
    fn default() -> Self {
        Self::new()
    }
}
