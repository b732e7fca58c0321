//! Engine Module
//!
//! Coordinates the keyed store and its persistence.
//!
//! ## Responsibilities
//! - Open the data directory and load the primary file on startup
//! - Save, reload, manual backup, and restore-from-backup
//! - Whole-store replacement as a single atomic step
//! - Re-validation audit and file information

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::clock;
use crate::config::Config;
use crate::error::{Result, RosterError, ValidationError};
use crate::log::{LogLevel, Logger, TracingLogger};
use crate::persist::{LoadReport, PersistenceManager};
use crate::table::{KeyedStore, TableStats};
use crate::validate::Validator;

/// Sizes of the files the engine manages (None = file absent)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    pub primary_bytes: Option<u64>,
    pub backup_bytes: Option<u64>,
}

/// The record engine
///
/// ## Concurrency Model
///
/// - All record operations go through `store()`, which serializes them
///   behind the store's own mutex.
/// - `reload` and `restore` build a complete replacement store first and
///   then swap it in with `KeyedStore::replace_with`, so readers see either
///   the old contents or the new, never a mix.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// The records
    store: KeyedStore,

    /// Primary data file (+ automatic `.bak`)
    persistence: PersistenceManager,

    /// Shared with the store and every persistence manager the engine creates
    logger: Arc<dyn Logger>,
}

impl Engine {
    // =========================================================================
    // Internal Path Constants
    // =========================================================================
    const DATA_FILENAME: &'static str = "employees.dat";
    const MANUAL_BACKUP_PREFIX: &'static str = "backup_";
    const MANUAL_BACKUP_EXTENSION: &'static str = ".dat";

    /// Open or create an engine with the given config, logging via `tracing`
    pub fn open(config: Config) -> Result<Self> {
        Self::open_with_logger(config, Arc::new(TracingLogger))
    }

    /// Open or create an engine
    ///
    /// On startup:
    /// 1. Validate the config
    /// 2. Create the data directory if it doesn't exist
    /// 3. Build an empty store
    /// 4. Load the primary data file (absent file = empty store)
    pub fn open_with_logger(config: Config, logger: Arc<dyn Logger>) -> Result<Self> {
        config.validate()?;
        fs::create_dir_all(&config.data_dir)?;

        let store = KeyedStore::builder()
            .buckets(config.initial_bucket_count)
            .max_load_factor(config.max_load_factor)
            .logger(Arc::clone(&logger))
            .build();

        let data_path = config.data_dir.join(Self::DATA_FILENAME);
        let persistence = PersistenceManager::with_logger(data_path, Arc::clone(&logger));

        let report = persistence.load(&store)?;
        if report.skipped > 0 {
            logger.log(
                LogLevel::Warning,
                &format!("{} records could not be recovered", report.skipped),
            );
        }

        Ok(Self {
            config,
            store,
            persistence,
            logger,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// The record store
    pub fn store(&self) -> &KeyedStore {
        &self.store
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Save to the primary file (previous contents go to `.bak`)
    pub fn save(&self) -> Result<usize> {
        self.persistence.save(&self.store)
    }

    /// Discard in-memory changes and load the primary file again
    pub fn reload(&self) -> Result<LoadReport> {
        let fresh = self.store.empty_like();
        let report = self.persistence.load(&fresh)?;
        self.store.replace_with(fresh)?;
        Ok(report)
    }

    /// Write a timestamped copy of the store to the data directory
    ///
    /// Named `backup_YYYYMMDD_HHMMSS.dat`; a second backup within the same
    /// second gets a `_1`, `_2`, ... suffix instead of overwriting the first.
    /// Returns the path of the backup file.
    pub fn backup(&self) -> Result<PathBuf> {
        let stamp = clock::format_stamp(clock::now_epoch_secs());
        let path = self.unused_backup_path(&stamp);

        // The target is new, so the save leaves no `.bak` beside it
        PersistenceManager::with_logger(&path, Arc::clone(&self.logger)).save(&self.store)?;
        self.logger.log(
            LogLevel::Info,
            &format!("Manual backup created: {}", path.display()),
        );
        Ok(path)
    }

    fn unused_backup_path(&self, stamp: &str) -> PathBuf {
        let named = |suffix: String| {
            self.config.data_dir.join(format!(
                "{}{}{}{}",
                Self::MANUAL_BACKUP_PREFIX,
                stamp,
                suffix,
                Self::MANUAL_BACKUP_EXTENSION
            ))
        };

        let mut path = named(String::new());
        let mut n = 1u32;
        while path.exists() {
            path = named(format!("_{}", n));
            n += 1;
        }
        path
    }

    /// Replace the store's contents with the records in `path`
    ///
    /// The file is loaded into a fresh store first; the live store is only
    /// replaced once that load succeeds. A missing file is an error here
    /// (unlike startup) so a typo cannot wipe the store.
    pub fn restore(&self, path: &Path) -> Result<LoadReport> {
        if !path.is_file() {
            return Err(RosterError::Storage(format!(
                "Backup file not found: {}",
                path.display()
            )));
        }

        let fresh = self.store.empty_like();
        let report =
            PersistenceManager::with_logger(path, Arc::clone(&self.logger)).load(&fresh)?;
        self.store.replace_with(fresh)?;

        self.logger.log(
            LogLevel::Info,
            &format!(
                "Restored {} employees from {}",
                report.loaded,
                path.display()
            ),
        );
        Ok(report)
    }

    /// Drop every record (the files are left alone until the next save)
    pub fn clear(&self) {
        self.store.clear();
    }

    /// CSV projection of the store
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        self.persistence.export_csv(&self.store, path)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Re-check every stored record against the store's validator
    pub fn audit(&self) -> Vec<(String, ValidationError)> {
        self.audit_with(self.store.validator())
    }

    /// Re-check every stored record against `rules`
    ///
    /// Returns `(id, violation)` for each record that does not pass, sorted
    /// by id. Useful after tightening the rules a store was loaded with.
    pub fn audit_with(&self, rules: &dyn Validator) -> Vec<(String, ValidationError)> {
        let mut failures: Vec<(String, ValidationError)> = self
            .store
            .get_all()
            .into_iter()
            .filter_map(|r| rules.validate(&r).err().map(|e| (r.id, e)))
            .collect();
        failures.sort_by(|a, b| a.0.cmp(&b.0));
        failures
    }

    pub fn statistics(&self) -> TableStats {
        self.store.statistics()
    }

    /// Sizes of the primary file and its automatic backup
    pub fn file_info(&self) -> FileInfo {
        let size = |p: &Path| fs::metadata(p).ok().map(|m| m.len());
        FileInfo {
            primary_bytes: size(self.persistence.data_path()),
            backup_bytes: size(self.persistence.backup_path()),
        }
    }

    /// Close the engine, saving first when `save_on_close` is set
    pub fn close(self) -> Result<()> {
        if self.config.save_on_close {
            self.save()?;
        }
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    pub fn data_path(&self) -> &Path {
        self.persistence.data_path()
    }

    pub fn backup_path(&self) -> &Path {
        self.persistence.backup_path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
