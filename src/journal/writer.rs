//! Journal Writer
//!
//! Handles appending entries to the journal and rewriting it on compaction.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::{Action, JournalEntry};
use crate::config::JournalSyncStrategy;
use crate::error::{JotError, Result};

/// Writes entries to the journal file
pub struct JournalWriter {
    path: PathBuf,
    file: File,
    sync_strategy: JournalSyncStrategy,
    file_mode: u32,

    /// Appends since the last fsync
    unsynced: usize,

    /// Appends through this writer since it was opened
    entries_written: u64,
}

impl JournalWriter {
    /// Open or create a journal file
    ///
    /// Any failure here is fatal for the store and surfaces as
    /// [`JotError::Open`].
    pub fn open(path: &Path, sync_strategy: JournalSyncStrategy, file_mode: u32) -> Result<Self> {
        let file = open_journal_file(path, file_mode).map_err(|e| JotError::open(path, e))?;
        debug!(path = %path.display(), "journal opened");

        Ok(Self {
            path: path.to_path_buf(),
            file,
            sync_strategy,
            file_mode,
            unsynced: 0,
            entries_written: 0,
        })
    }

    /// Append one entry as a single line
    pub fn append(&mut self, action: Action, payload: Vec<u8>) -> Result<()> {
        let line = JournalEntry::new(action, payload).to_line()?;

        self.file
            .write_all(&line)
            .map_err(JotError::journal_write)?;
        self.unsynced += 1;
        self.entries_written += 1;

        match self.sync_strategy {
            JournalSyncStrategy::EveryWrite => self.sync()?,
            JournalSyncStrategy::EveryNEntries { count } => {
                if self.unsynced >= count {
                    self.sync()?;
                }
            }
        }

        Ok(())
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        if self.unsynced == 0 {
            return Ok(());
        }
        self.file.sync_data().map_err(JotError::journal_write)?;
        self.unsynced = 0;
        Ok(())
    }

    /// Replace the journal with one add entry per payload
    ///
    /// The new contents are written to a sibling temp file, synced and then
    /// renamed over the journal. Until the rename the old journal is left
    /// untouched, so a failure or crash never loses the previous state.
    /// Returns the number of entries written.
    pub fn compact<I>(&mut self, payloads: I) -> Result<usize>
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        // Frame every line before touching the disk
        let lines = payloads
            .into_iter()
            .map(|payload| JournalEntry::new(Action::Add, payload).to_line())
            .collect::<Result<Vec<_>>>()?;

        let temp_path = self.compaction_path();
        if let Err(e) = self.write_compacted(&temp_path, &lines) {
            if let Err(remove_err) = fs::remove_file(&temp_path) {
                debug!(path = %temp_path.display(), error = %remove_err, "no compaction temp file to remove");
            }
            return Err(JotError::Compaction(e.to_string()));
        }

        fs::rename(&temp_path, &self.path).map_err(|e| JotError::Compaction(e.to_string()))?;
        sync_parent_dir(&self.path);

        // The old handle still points at the replaced inode
        self.file = open_journal_file(&self.path, self.file_mode)
            .map_err(|e| JotError::Compaction(e.to_string()))?;
        self.unsynced = 0;

        info!(path = %self.path.display(), entries = lines.len(), "journal compacted");
        Ok(lines.len())
    }

    /// Path of the journal file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of appends through this writer since it was opened
    pub fn entries_written(&self) -> u64 {
        self.entries_written
    }

    /// Current journal size in bytes
    pub fn size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Copy the journal as it is now to `<name>.corrupt`
    ///
    /// Overwrites an earlier copy. Returns the path of the copy.
    pub fn preserve_copy(&self) -> Result<PathBuf> {
        let copy_path = self.sibling_path(".corrupt");
        fs::copy(&self.path, &copy_path)?;
        debug!(path = %copy_path.display(), "journal copy written");
        Ok(copy_path)
    }

    fn compaction_path(&self) -> PathBuf {
        self.sibling_path(".compact")
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("journal"));
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn write_compacted(&self, temp_path: &Path, lines: &[Vec<u8>]) -> std::io::Result<()> {
        let file = create_temp_file(temp_path, self.file_mode)?;
        let mut writer = BufWriter::new(file);
        for line in lines {
            writer.write_all(line)?;
        }
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }
}

fn open_journal_file(path: &Path, mode: u32) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.read(true).append(true).create(true);
    set_mode(&mut options, mode);
    options.open(path)
}

fn create_temp_file(path: &Path, mode: u32) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    set_mode(&mut options, mode);
    options.open(path)
}

#[cfg(unix)]
fn set_mode(options: &mut OpenOptions, mode: u32) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(mode);
}

#[cfg(not(unix))]
fn set_mode(_options: &mut OpenOptions, _mode: u32) {}

/// Make the rename itself durable
#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
        warn!(dir = %parent.display(), error = %e, "failed to sync journal directory after compaction");
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}
