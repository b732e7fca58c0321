//! Persistence Manager
//!
//! Saves and loads the full record set of a store.
//!
//! ## Responsibilities
//! - Copy the previous file to `<file>.bak` before every overwrite
//! - Write the count line followed by one encoded record per line
//! - Load tolerantly: bad lines are skipped and counted, never fatal
//! - CSV projection

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Result, RosterError};
use crate::log::{LogLevel, Logger, TracingLogger};
use crate::record::Record;
use crate::table::KeyedStore;

use super::codec::{decode_record, encode_record};
use super::export::write_csv;

/// Appended to the data file name to form the automatic backup path
pub const BACKUP_SUFFIX: &str = ".bak";

/// Outcome of a [`PersistenceManager::load`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// False when there was no file to load (first run)
    pub file_found: bool,

    /// Count from the header line, if it parsed (advisory only)
    pub declared_count: Option<usize>,

    /// Records inserted into the store
    pub loaded: usize,

    /// Lines that failed to decode or validate
    pub skipped: usize,

    /// Lines whose id was already in the store
    pub duplicates: usize,
}

/// Reads and writes one data file
///
/// ## Concurrency:
/// - File access is serialized by `file_lock`
/// - The store is only touched through its public operations
pub struct PersistenceManager {
    data_path: PathBuf,
    backup_path: PathBuf,
    logger: Arc<dyn Logger>,
    file_lock: Mutex<()>,
}

impl PersistenceManager {
    /// Manager for `path`, logging through `tracing`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_logger(path, Arc::new(TracingLogger))
    }

    pub fn with_logger(path: impl Into<PathBuf>, logger: Arc<dyn Logger>) -> Self {
        let data_path = path.into();
        let backup_path = Self::backup_path_for(&data_path);
        Self {
            data_path,
            backup_path,
            logger,
            file_lock: Mutex::new(()),
        }
    }

    /// Write every record in `store` to the data file
    ///
    /// Steps:
    /// 1. Copy the existing file (if any) to the backup path
    /// 2. Truncate and write `count\n` then one line per record
    /// 3. Flush and fsync
    ///
    /// Returns the number of records written.
    pub fn save(&self, store: &KeyedStore) -> Result<usize> {
        let _guard = self.file_lock.lock();

        self.backup_existing();

        let records = store.get_all();
        let file = match File::create(&self.data_path) {
            Ok(f) => f,
            Err(e) => {
                self.logger.log(
                    LogLevel::Error,
                    &format!(
                        "Failed to open file for writing: {}: {}",
                        self.data_path.display(),
                        e
                    ),
                );
                return Err(e.into());
            }
        };

        if let Err(e) = Self::write_records(file, &records) {
            self.logger
                .log(LogLevel::Error, &format!("Error saving data: {}", e));
            return Err(e);
        }

        self.logger.log(
            LogLevel::Info,
            &format!(
                "Saved {} employees to {}",
                records.len(),
                self.data_path.display()
            ),
        );
        Ok(records.len())
    }

    /// Insert every recoverable record from the data file into `store`
    ///
    /// - Missing file: not an error, returns a report with `file_found = false`
    /// - Header count: advisory; a bad header is logged and ignored
    /// - Reading stops at EOF or the first blank line
    /// - A line that fails to decode or validate is logged and counted in
    ///   `skipped`; a line whose id is already present counts as a duplicate
    pub fn load(&self, store: &KeyedStore) -> Result<LoadReport> {
        let _guard = self.file_lock.lock();

        let file = match File::open(&self.data_path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.logger.log(
                    LogLevel::Info,
                    "Data file not found, starting with empty database",
                );
                return Ok(LoadReport::default());
            }
            Err(e) => {
                self.logger.log(
                    LogLevel::Error,
                    &format!("Error loading data: {}: {}", self.data_path.display(), e),
                );
                return Err(e.into());
            }
        };

        let mut reader = BufReader::new(file);
        let mut report = LoadReport {
            file_found: true,
            ..LoadReport::default()
        };
        let mut buf = Vec::new();

        // Header: declared record count
        if reader.read_until(b'\n', &mut buf)? == 0 {
            self.logger.log(LogLevel::Info, "Data file is empty");
            return Ok(report);
        }
        report.declared_count = std::str::from_utf8(trim_line(&buf))
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok());
        if report.declared_count.is_none() {
            self.logger.log(
                LogLevel::Warning,
                "Unreadable record count header, reading records anyway",
            );
        }

        // Body: one record per line
        let mut line_number = 1;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;

            let line = trim_line(&buf);
            if line.is_empty() {
                break;
            }

            let outcome = std::str::from_utf8(line)
                .map_err(|e| RosterError::Decode(format!("line is not valid UTF-8: {}", e)))
                .and_then(decode_record)
                .and_then(|record| store.insert(record));

            match outcome {
                Ok(true) => report.loaded += 1,
                Ok(false) => report.duplicates += 1,
                Err(e) => {
                    report.skipped += 1;
                    self.logger.log(
                        LogLevel::Warning,
                        &format!(
                            "Failed to load employee record on line {}: {}",
                            line_number, e
                        ),
                    );
                }
            }
        }

        if let Some(declared) = report.declared_count {
            let seen = report.loaded + report.skipped + report.duplicates;
            if declared != seen {
                self.logger.log(
                    LogLevel::Warning,
                    &format!(
                        "Header declares {} records but {} lines were read",
                        declared, seen
                    ),
                );
            }
        }

        self.logger.log(
            LogLevel::Info,
            &format!(
                "Loaded {} employees from {} ({} skipped, {} duplicates)",
                report.loaded,
                self.data_path.display(),
                report.skipped,
                report.duplicates
            ),
        );
        Ok(report)
    }

    /// Write a CSV projection of `store` to `path`
    ///
    /// Returns the number of rows written (excluding the header).
    pub fn export_csv(&self, store: &KeyedStore, path: &Path) -> Result<usize> {
        let _guard = self.file_lock.lock();

        let records = store.get_all();
        let result = File::create(path)
            .map_err(RosterError::from)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                write_csv(&mut writer, &records)?;
                writer.flush()?;
                Ok(())
            });

        match result {
            Ok(()) => {
                self.logger.log(
                    LogLevel::Info,
                    &format!(
                        "Exported {} employees to CSV: {}",
                        records.len(),
                        path.display()
                    ),
                );
                Ok(records.len())
            }
            Err(e) => {
                self.logger.log(
                    LogLevel::Error,
                    &format!("Error exporting CSV to {}: {}", path.display(), e),
                );
                Err(e)
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// "employees.dat" → "employees.dat.bak"
    fn backup_path_for(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Copy (not rename) the current file to the backup path; failure is
    /// logged and the save goes ahead
    fn backup_existing(&self) {
        if !self.data_path.exists() {
            return;
        }
        match fs::copy(&self.data_path, &self.backup_path) {
            Ok(bytes) => self.logger.log(
                LogLevel::Debug,
                &format!(
                    "Backed up {} bytes to {}",
                    bytes,
                    self.backup_path.display()
                ),
            ),
            Err(e) => self.logger.log(
                LogLevel::Warning,
                &format!(
                    "Failed to back up {} to {}: {}",
                    self.data_path.display(),
                    self.backup_path.display(),
                    e
                ),
            ),
        }
    }

    fn write_records(file: File, records: &[Record]) -> Result<()> {
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", records.len())?;
        for record in records {
            writeln!(writer, "{}", encode_record(record))?;
        }
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| {
            RosterError::Storage(format!("Failed to flush data file: {}", e))
        })?;
        file.sync_all()?;
        Ok(())
    }
}

/// Strip a trailing `\n` and then a trailing `\r`
fn trim_line(buf: &[u8]) -> &[u8] {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    line.strip_suffix(b"\r").unwrap_or(line)
}
