//! Journal Recovery
//!
//! Rebuilds the in-memory index by replaying the journal.

use std::path::Path;

use tracing::{debug, warn};

use super::{JournalReader, ParsedLine};
use crate::codec::Codec;
use crate::error::{JotError, Result};
use crate::index::{IdAllocator, RecordIndex};
use crate::record::{Record, RecordId};

/// Handles journal replay on open
pub struct JournalRecovery;

/// Where and why a replay stopped early
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStop {
    /// 1-based line number of the offending line
    pub line: u64,

    /// Parse, decode or read error text
    pub reason: String,
}

/// Result of a replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Number of entries applied to the index
    pub entries_applied: u64,

    /// Entries with an unknown action tag, decoded but not applied
    pub entries_skipped: u64,

    /// Lines after the stop point that were never applied
    pub lines_dropped: u64,

    /// Set when replay stopped before the end of the journal
    pub stopped_at: Option<ReplayStop>,

    /// Allocator position after replay
    pub next_id: RecordId,

    /// Records left in the index after replay
    pub live_records: usize,
}

impl ReplayResult {
    /// Whether every line of the journal was consumed
    pub fn is_clean(&self) -> bool {
        self.stopped_at.is_none()
    }
}

impl Default for ReplayResult {
    fn default() -> Self {
        Self {
            entries_applied: 0,
            entries_skipped: 0,
            lines_dropped: 0,
            stopped_at: None,
            next_id: IdAllocator::new().next_id(),
            live_records: 0,
        }
    }
}

impl JournalRecovery {
    /// Replay a journal file into `index`
    ///
    /// Entries are applied in file order. The first line that cannot be
    /// split, decoded or read ends the replay: everything before it stays
    /// applied, everything after it is counted in `lines_dropped` and lost.
    /// Only a failure to open the file is returned as an error.
    pub fn replay<R, C>(path: &Path, codec: &C, index: &mut RecordIndex<R>) -> Result<ReplayResult>
    where
        R: Record,
        C: Codec<R>,
    {
        let mut reader = JournalReader::open(path)?;
        let mut result = ReplayResult::default();

        while let Some(next) = reader.next() {
            let applied = next.and_then(|(line_number, line)| {
                apply_line(line_number, &line, codec, index)
            });

            match applied {
                Ok(true) => result.entries_applied += 1,
                Ok(false) => result.entries_skipped += 1,
                Err(e) => {
                    result.stopped_at = Some(stop_from_error(e, reader.line_number()));
                    result.lines_dropped = count_remaining(&mut reader);
                    break;
                }
            }
        }

        result.next_id = index.next_id();
        result.live_records = index.len();

        match &result.stopped_at {
            Some(stop) => warn!(
                path = %path.display(),
                line = stop.line,
                reason = %stop.reason,
                applied = result.entries_applied,
                dropped = result.lines_dropped,
                "journal replay stopped early, later entries dropped"
            ),
            None => debug!(
                path = %path.display(),
                applied = result.entries_applied,
                skipped = result.entries_skipped,
                live = result.live_records,
                "journal replayed"
            ),
        }

        Ok(result)
    }

    /// Replay a journal into a scratch index and report what it contains
    ///
    /// Nothing is modified on disk.
    pub fn verify<R, C>(path: &Path, codec: &C) -> Result<ReplayResult>
    where
        R: Record,
        C: Codec<R>,
    {
        let mut scratch = RecordIndex::<R>::new();
        Self::replay(path, codec, &mut scratch)
    }
}

/// Apply one line; `Ok(false)` means the action tag was unknown
fn apply_line<R, C>(
    line_number: u64,
    line: &str,
    codec: &C,
    index: &mut RecordIndex<R>,
) -> Result<bool>
where
    R: Record,
    C: Codec<R>,
{
    let parsed = ParsedLine::parse(line_number, line)?;
    let record = codec
        .decode(parsed.payload.as_bytes())
        .map_err(|e| JotError::malformed(line_number, e.to_string()))?;

    match parsed.action {
        Some(action) => {
            index
                .apply(action, record)
                .map_err(|e| JotError::malformed(line_number, e.to_string()))?;
            Ok(true)
        }
        None => {
            warn!(line = line_number, tag = parsed.tag, "skipping journal entry with unknown action");
            Ok(false)
        }
    }
}

fn stop_from_error(err: JotError, line_number: u64) -> ReplayStop {
    match err {
        JotError::MalformedEntry { line, reason } => ReplayStop { line, reason },
        other => ReplayStop {
            line: line_number + 1,
            reason: other.to_string(),
        },
    }
}

fn count_remaining(reader: &mut JournalReader) -> u64 {
    let mut dropped = 0;
    loop {
        match reader.next_line() {
            Ok(Some(_)) => dropped += 1,
            Ok(None) => break,
            // Invalid UTF-8 is still a line; a read error ends the scan
            Err(JotError::MalformedEntry { .. }) => dropped += 1,
            Err(_) => break,
        }
    }
    dropped
}
