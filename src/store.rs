//! Store Module
//!
//! The record store that coordinates the journal and the in-memory index.
//!
//! ## Responsibilities
//! - Replay the journal on open and repair a damaged one
//! - Journal every mutation and apply it to the index
//! - Compact the journal on close and gate every call after it
//!
//! ## Lifecycle
//! ```text
//!   open ──replay──▶ Open ──close/compact──▶ Closed (terminal)
//! ```
//! After close, reads return nothing and mutations do nothing. None of
//! those calls is an error: `add` returns `Ok(None)`, `update`/`delete`
//! return `Ok(false)`, `get` returns `None`.
//!
//! ## Write Failures
//! A mutation changes the index first-or-regardless and then reports a
//! journal failure as an error. Memory and journal may disagree until the
//! next successful compaction.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::codec::{Codec, JsonCodec};
use crate::config::Config;
use crate::error::{JotError, Result};
use crate::index::RecordIndex;
use crate::journal::{Action, JournalRecovery, JournalWriter, ReplayResult};
use crate::record::{Record, RecordId, UNASSIGNED_ID};

/// A journal-backed collection of records
///
/// ## Concurrency Model
///
/// Single owner, synchronous I/O. Every mutating call takes `&mut self`,
/// and the journal handle is held exclusively until the store is dropped.
/// Opening two stores on the same file is not supported.
pub struct Store<R, C = JsonCodec> {
    /// Store configuration
    config: Config,

    /// Payload encoding for journal lines
    codec: C,

    /// Append-only journal
    journal: JournalWriter,

    /// Live records and the id allocator
    index: RecordIndex<R>,

    /// What the replay on open found
    recovery: ReplayResult,

    closed: bool,
}

impl<R> Store<R, JsonCodec>
where
    R: Record + Serialize + DeserializeOwned,
{
    /// Open a JSON journal at `path` with default settings
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let config = Config::builder().journal_path(path.as_ref()).build();
        Self::open(config, JsonCodec)
    }
}

impl<R, C> Store<R, C>
where
    R: Record,
    C: Codec<R>,
{
    /// Open or create a store
    ///
    /// On startup:
    /// 1. Validate config and create parent directories
    /// 2. Open/create the journal (fatal on failure)
    /// 3. Replay the journal into the index
    /// 4. Repair a damaged journal
    /// 5. Ready to serve requests
    ///
    /// Replay problems do not fail the open: the store starts with whatever
    /// state was recovered and [`Store::recovery`] reports what happened.
    ///
    /// When replay stopped at a bad line, the journal is copied to
    /// `<name>.corrupt` and rewritten to the recovered records. Later appends
    /// then follow a clean journal instead of a tail that replay would never
    /// reach. A failed repair fails the open.
    pub fn open(config: Config, codec: C) -> Result<Self> {
        // Step 1: Config and directories
        config.validate()?;
        let path = config.journal_path.clone();
        if config.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| JotError::open(&path, e))?;
            }
        }

        // Step 2: Journal
        let journal = JournalWriter::open(&path, config.sync_strategy, config.file_mode)?;

        // Step 3: Replay
        let mut index = RecordIndex::new();
        let recovery = match JournalRecovery::replay(&path, &codec, &mut index) {
            Ok(result) => result,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "journal replay failed, starting empty");
                ReplayResult::default()
            }
        };

        let mut store = Self {
            config,
            codec,
            journal,
            index,
            recovery,
            closed: false,
        };

        // Step 4: Repair
        if let Some(stop) = store.recovery.stopped_at.clone() {
            warn!(
                path = %path.display(),
                line = stop.line,
                reason = %stop.reason,
                lines_dropped = store.recovery.lines_dropped,
                "journal damaged, rewriting recovered records"
            );
            store.repair_journal()?;
        }

        info!(
            path = %path.display(),
            records = store.index.len(),
            next_id = store.index.next_id(),
            "store opened"
        );

        Ok(store)
    }

    /// Get a record by identifier
    ///
    /// `None` if the record does not exist or the store is closed.
    pub fn get(&self, id: RecordId) -> Option<&R> {
        if self.closed {
            return None;
        }
        self.index.get(id)
    }

    /// Add a new record under a freshly assigned identifier
    ///
    /// Any identifier the record already carries is replaced. Returns the
    /// assigned id, or `None` if the store is closed. Once every identifier
    /// is taken this fails with [`JotError::IdsExhausted`] and neither the
    /// index nor the journal is touched.
    pub fn add(&mut self, mut record: R) -> Result<Option<RecordId>> {
        if self.closed {
            debug!("add ignored, store is closed");
            return Ok(None);
        }

        let id = self.index.allocate().map_err(|e| {
            warn!(error = %e, "add rejected");
            e
        })?;
        record.set_id(id);
        let written = self.append(Action::Add, &record);
        self.index.upsert(record)?;

        written.map(|_| Some(id))
    }

    /// Replace the record stored under `record.id()`
    ///
    /// An unassigned record gets a new id; an id that is not in the index is
    /// inserted. Both mirror how replay treats update entries. Returns
    /// `false` if the store is closed. An unassigned record fails with
    /// [`JotError::IdsExhausted`] once every identifier is taken.
    pub fn update(&mut self, mut record: R) -> Result<bool> {
        if self.closed {
            debug!("update ignored, store is closed");
            return Ok(false);
        }

        if record.id() == UNASSIGNED_ID {
            let id = self.index.allocate().map_err(|e| {
                warn!(error = %e, "update of unassigned record rejected");
                e
            })?;
            record.set_id(id);
            debug!(id, "update of unassigned record, allocated new id");
        } else if !self.index.contains(record.id()) {
            debug!(id = record.id(), "update of unknown id, inserting");
        }

        let written = self.append(Action::Update, &record);
        self.index.upsert(record)?;

        written.map(|_| true)
    }

    /// Delete a record
    ///
    /// Deleting an id that is not present still journals the delete.
    /// Returns `false` if the store is closed.
    pub fn delete(&mut self, record: &R) -> Result<bool> {
        if self.closed {
            debug!("delete ignored, store is closed");
            return Ok(false);
        }

        let written = self.append(Action::Delete, record);
        self.index.remove(record.id());

        written.map(|_| true)
    }

    /// Delete a record by identifier, returning it if it was live
    pub fn delete_by_id(&mut self, id: RecordId) -> Result<Option<R>> {
        if self.closed {
            debug!(id, "delete ignored, store is closed");
            return Ok(None);
        }

        let removed = self.index.remove(id);
        let written = match &removed {
            Some(record) => self.append(Action::Delete, record),
            None => {
                let mut tombstone = R::default();
                tombstone.set_id(id);
                self.append(Action::Delete, &tombstone)
            }
        };

        written.map(|_| removed)
    }

    /// Visit every live record
    ///
    /// Does nothing if the store is closed. Callers must not rely on the
    /// visiting order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&R),
    {
        if self.closed {
            return;
        }
        for record in self.index.iter() {
            visit(record);
        }
    }

    /// Rewrite the journal to one add entry per live record
    ///
    /// Returns the number of entries written, or `None` if the store is
    /// closed.
    ///
    /// Deletes are not kept. An id that was deleted and sits above the
    /// highest live id is forgotten, so after a reopen the allocator restarts
    /// right after the highest live id and may hand that id out again.
    pub fn compact(&mut self) -> Result<Option<usize>> {
        if self.closed {
            debug!("compact ignored, store is closed");
            return Ok(None);
        }
        self.compact_journal().map(Some)
    }

    /// Close the store
    ///
    /// Marks the store closed, then compacts the journal (or only syncs it
    /// when `compact_on_close` is off). Closing twice does nothing.
    ///
    /// Compaction keeps only live records. Ids deleted above the highest
    /// live id are forgotten, so the next open restarts allocation right
    /// after the highest live id. With `compact_on_close` off the deletes
    /// stay in the journal and those ids are never reused.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        if self.config.compact_on_close {
            self.compact_journal()?;
        } else {
            self.journal.sync()?;
        }

        info!(path = %self.journal.path().display(), records = self.index.len(), "store closed");
        Ok(())
    }

    fn repair_journal(&mut self) -> Result<()> {
        let copy = self.journal.preserve_copy().map_err(|e| {
            error!(path = %self.journal.path().display(), error = %e, "failed to copy damaged journal");
            e
        })?;
        let entries = self.compact_journal()?;
        info!(copy = %copy.display(), entries, "damaged journal repaired");
        Ok(())
    }

    fn compact_journal(&mut self) -> Result<usize> {
        let payloads = self
            .index
            .iter()
            .map(|record| self.codec.encode(record))
            .collect::<Result<Vec<_>>>()?;

        self.journal.compact(payloads).map_err(|e| {
            error!(path = %self.journal.path().display(), error = %e, "compaction failed, previous journal kept");
            e
        })
    }

    fn append(&mut self, action: Action, record: &R) -> Result<()> {
        let result = self
            .codec
            .encode(record)
            .and_then(|payload| self.journal.append(action, payload));

        if let Err(e) = &result {
            error!(%action, id = record.id(), error = %e, "journal append failed, change kept in memory only");
        }
        result
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of live records (0 once closed)
    pub fn len(&self) -> usize {
        if self.closed {
            return 0;
        }
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: RecordId) -> bool {
        !self.closed && self.index.contains(id)
    }

    /// Identifier the next `add` will assign
    pub fn next_id(&self) -> RecordId {
        self.index.next_id()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Path of the journal file
    pub fn path(&self) -> &Path {
        self.journal.path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// What the replay on open found
    pub fn recovery(&self) -> &ReplayResult {
        &self.recovery
    }
}
