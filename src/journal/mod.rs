//! Journal Module
//!
//! Provides durability through an append-only, line-oriented log.
//!
//! ## Responsibilities
//! - Append one line per mutation, in program order
//! - Replay the log on open (last write wins per identifier)
//! - Rewrite the log down to the live set (compaction)
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ a:{"id":1,"value":"a"}\n                │  add
//! │ a:{"id":2,"value":"b"}\n                │  add
//! │ u:{"id":2,"value":"B"}\n                │  update
//! │ d:{"id":1,"value":"a"}\n                │  delete
//! └─────────────────────────────────────────┘
//!   │ │
//!   │ └── separator `:` (first one on the line)
//!   └──── action tag
//! ```

mod entry;
mod reader;
mod recovery;
mod writer;

pub use entry::{Action, JournalEntry, ParsedLine, SEPARATOR};
pub use reader::JournalReader;
pub use recovery::{JournalRecovery, ReplayResult, ReplayStop};
pub use writer::JournalWriter;
