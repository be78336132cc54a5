//! Journal entry definitions
//!
//! Defines the structure of a single journal line.

use std::fmt;

use crate::error::{JotError, Result};

/// Separator between the action tag and the payload
pub const SEPARATOR: char = ':';

/// Mutations that can be logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// A new record was added
    Add,

    /// An existing record was replaced
    Update,

    /// A record was removed
    Delete,
}

impl Action {
    /// Single-character tag written to the journal
    pub fn tag(self) -> char {
        match self {
            Action::Add => 'a',
            Action::Update => 'u',
            Action::Delete => 'd',
        }
    }

    /// Parse an action tag, `None` if it is not one we write
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "a" => Some(Action::Add),
            "u" => Some(Action::Update),
            "d" => Some(Action::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Add => "add",
            Action::Update => "update",
            Action::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// A single entry in the journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// The mutation this entry records
    pub action: Action,

    /// Codec output for the record
    pub payload: Vec<u8>,
}

impl JournalEntry {
    pub fn new(action: Action, payload: Vec<u8>) -> Self {
        Self { action, payload }
    }

    /// Serialize to `<tag>:<payload>\n`
    ///
    /// Fails if the payload would break the one-entry-per-line framing.
    pub fn to_line(&self) -> Result<Vec<u8>> {
        if self.payload.contains(&b'\n') {
            return Err(JotError::Serialization(format!(
                "{} payload contains a newline and cannot be journaled",
                self.action
            )));
        }

        let mut line = Vec::with_capacity(self.payload.len() + 3);
        line.push(self.action.tag() as u8);
        line.push(SEPARATOR as u8);
        line.extend_from_slice(&self.payload);
        line.push(b'\n');
        Ok(line)
    }
}

/// A journal line split into its parts, borrowed from the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedLine<'a> {
    /// Raw tag text before the separator
    pub tag: &'a str,

    /// Decoded action, `None` for tags this version does not know
    pub action: Option<Action>,

    /// Everything after the first separator
    pub payload: &'a str,
}

impl<'a> ParsedLine<'a> {
    /// Split a line (without its trailing newline) on the first separator
    pub fn parse(line_number: u64, line: &'a str) -> Result<Self> {
        let (tag, payload) = line
            .split_once(SEPARATOR)
            .ok_or_else(|| JotError::malformed(line_number, "missing action separator"))?;

        Ok(Self {
            tag,
            action: Action::from_tag(tag),
            payload,
        })
    }
}
