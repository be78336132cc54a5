//! Record contract
//!
//! A store holds values of one caller-defined type. The only thing the store
//! needs from that type is an identifier it can read and assign, plus a way
//! to build an empty instance for decoding (`Default`).

/// Identifier of a record within one store
pub type RecordId = u64;

/// Sentinel identifier for a record that has not been assigned an id yet
pub const UNASSIGNED_ID: RecordId = 0;

/// A value that can live in a [`Store`](crate::Store).
///
/// `Default` acts as the factory used during replay: every journal entry is
/// decoded into a fresh `R::default()`.
///
/// ```
/// use jotdb::{Record, RecordId};
///
/// #[derive(Debug, Default, Clone)]
/// struct Note {
///     id: RecordId,
///     text: String,
/// }
///
/// impl Record for Note {
///     fn id(&self) -> RecordId {
///         self.id
///     }
///
///     fn set_id(&mut self, id: RecordId) {
///         self.id = id;
///     }
/// }
///
/// let note = Note::default();
/// assert!(!note.is_assigned());
/// ```
pub trait Record: Default {
    /// Current identifier, `UNASSIGNED_ID` if none
    fn id(&self) -> RecordId;

    /// Overwrite the identifier
    fn set_id(&mut self, id: RecordId);

    /// Whether the record carries a real identifier
    fn is_assigned(&self) -> bool {
        self.id() != UNASSIGNED_ID
    }
}
