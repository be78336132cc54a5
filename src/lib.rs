//! # jotdb
//!
//! An embedded, single-process record store with:
//! - An append-only, line-oriented journal for durability
//! - Replay on open with last-write-wins recovery
//! - Monotonic identifiers that are never reused
//! - Atomic compaction of the journal on close
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store                                │
//! │          (open → replay, mutations, close → compact)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Journal   │          │ RecordIndex │
//!   │  (Append)   │          │ + allocator │
//!   └──────┬──────┘          └─────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │    Codec    │
//!   │   (JSON)    │
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use jotdb::{Record, RecordId, Store};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Clone, Serialize, Deserialize)]
//! struct Item {
//!     #[serde(default)]
//!     id: RecordId,
//!     value: String,
//! }
//!
//! impl Record for Item {
//!     fn id(&self) -> RecordId { self.id }
//!     fn set_id(&mut self, id: RecordId) { self.id = id; }
//! }
//!
//! # fn main() -> jotdb::Result<()> {
//! let mut store: Store<Item> = Store::open_path("items.jnl")?;
//! let id = store.add(Item { id: 0, value: "a".into() })?;
//! store.for_each(|item| println!("{:?}", item));
//! store.close()?;
//! # let _ = id;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod codec;
pub mod journal;
pub mod index;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{JotError, Result};
pub use config::{Config, JournalSyncStrategy};
pub use record::{Record, RecordId, UNASSIGNED_ID};
pub use codec::{Codec, JsonCodec};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jotdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
