//! Identifier allocator
//!
//! Hands out strictly increasing identifiers and keeps itself ahead of every
//! identifier seen in the journal.

use crate::error::{JotError, Result};
use crate::record::{RecordId, UNASSIGNED_ID};

/// First identifier handed out by an empty store
pub const FIRST_ID: RecordId = 1;

/// Monotonic identifier source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdAllocator {
    next_id: RecordId,

    /// Set once `RecordId::MAX` has been handed out or observed
    exhausted: bool,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next_id: FIRST_ID,
            exhausted: false,
        }
    }

    /// Return the next identifier and advance past it
    ///
    /// Fails with [`JotError::IdsExhausted`] once every identifier up to
    /// `RecordId::MAX` is taken; the allocator is left unchanged.
    pub fn allocate(&mut self) -> Result<RecordId> {
        if self.exhausted {
            return Err(JotError::IdsExhausted);
        }
        let id = self.next_id;
        self.advance_past(id);
        Ok(id)
    }

    /// Reconcile with an identifier found in the journal
    ///
    /// An unassigned id takes the next free value. Whatever id results, the
    /// allocator moves past it. Returns the resolved id.
    pub fn observe(&mut self, id: RecordId) -> Result<RecordId> {
        if id == UNASSIGNED_ID {
            return self.allocate();
        }
        if !self.exhausted && id >= self.next_id {
            self.advance_past(id);
        }
        Ok(id)
    }

    /// Identifier the next `allocate` will return
    ///
    /// Meaningless once [`is_exhausted`](Self::is_exhausted) is true.
    pub fn next_id(&self) -> RecordId {
        self.next_id
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    fn advance_past(&mut self, id: RecordId) {
        match id.checked_add(1) {
            Some(next) => self.next_id = next,
            None => {
                self.next_id = RecordId::MAX;
                self.exhausted = true;
            }
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
