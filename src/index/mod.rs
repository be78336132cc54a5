//! Index Module
//!
//! In-memory view of the live records.
//!
//! ## Responsibilities
//! - Map identifier to current record value
//! - Assign new identifiers that are never reused
//! - Apply replayed journal entries (last write wins)
//!
//! ## Data Structure Choice
//! Using BTreeMap keyed by identifier:
//! - Enumeration in ascending id order, which is also insertion order for adds
//! - Deterministic compaction output
//! - Record sets are small, so ordered lookups cost nothing noticeable

mod allocator;
mod table;

pub use allocator::IdAllocator;
pub use table::RecordIndex;
