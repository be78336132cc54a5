//! Configuration for jotdb
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{JotError, Result};

/// Main configuration for a jotdb store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Journal Configuration
    // -------------------------------------------------------------------------
    /// Path of the journal file. Compaction writes a sibling
    /// `<file name>.compact` before renaming it over this path.
    pub journal_path: PathBuf,

    /// Sync strategy: how often to fsync the journal
    pub sync_strategy: JournalSyncStrategy,

    /// Permission bits for a newly created journal (unix only)
    pub file_mode: u32,

    /// Create missing parent directories of `journal_path` on open
    pub create_dirs: bool,

    // -------------------------------------------------------------------------
    // Lifecycle Configuration
    // -------------------------------------------------------------------------
    /// Rewrite the journal down to the live set when the store is closed
    pub compact_on_close: bool,
}

/// Journal sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalSyncStrategy {
    /// fsync after every append (safest, slowest)
    EveryWrite,

    /// fsync after N unsynced appends (balanced durability/performance)
    EveryNEntries { count: usize },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal_path: PathBuf::from("./records.jnl"),
            sync_strategy: JournalSyncStrategy::EveryNEntries { count: 100 },
            file_mode: 0o664,
            create_dirs: true,
            compact_on_close: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the configuration for values the store cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.journal_path.as_os_str().is_empty() {
            return Err(JotError::Config("journal path is empty".to_string()));
        }
        if self.journal_path.file_name().is_none() {
            return Err(JotError::Config(format!(
                "journal path {} does not name a file",
                self.journal_path.display()
            )));
        }
        if let JournalSyncStrategy::EveryNEntries { count: 0 } = self.sync_strategy {
            return Err(JotError::Config(
                "sync strategy EveryNEntries requires count > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the journal file path
    pub fn journal_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.journal_path = path.into();
        self
    }

    /// Set the journal sync strategy
    pub fn sync_strategy(mut self, strategy: JournalSyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the permission bits used when the journal is created
    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    /// Create missing parent directories on open
    pub fn create_dirs(mut self, enabled: bool) -> Self {
        self.config.create_dirs = enabled;
        self
    }

    /// Compact the journal when the store is closed
    pub fn compact_on_close(mut self, enabled: bool) -> Self {
        self.config.compact_on_close = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
