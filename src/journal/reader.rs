//! Journal Reader
//!
//! Reads the journal sequentially, one line at a time.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{JotError, Result};

/// Reads lines from the journal file
pub struct JournalReader {
    reader: BufReader<File>,
    line_number: u64,
    buf: Vec<u8>,
}

impl JournalReader {
    /// Open a journal file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            line_number: 0,
            buf: Vec::new(),
        })
    }

    /// Read the next line, returning its 1-based number and its text
    ///
    /// The trailing `\n` (or `\r\n`) is stripped. A line that is not valid
    /// UTF-8 is reported as malformed; the reader can still move past it.
    pub fn next_line(&mut self) -> Result<Option<(u64, String)>> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        let line = String::from_utf8(std::mem::take(&mut self.buf))
            .map_err(|e| JotError::malformed(self.line_number, e.to_string()))?;
        Ok(Some((self.line_number, line)))
    }

    /// Number of lines consumed so far
    pub fn line_number(&self) -> u64 {
        self.line_number
    }
}

impl Iterator for JournalReader {
    type Item = Result<(u64, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
