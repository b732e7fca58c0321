//! Configuration for RosterDB
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, RosterError};

/// Main configuration for a RosterDB instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── employees.dat                 (primary record file)
    ///     ├── employees.dat.bak             (copy taken before each save)
    ///     └── backup_YYYYMMDD_HHMMSS.dat    (manual backups)
    pub data_dir: PathBuf,

    /// Save the store when the database is closed
    pub save_on_close: bool,

    // -------------------------------------------------------------------------
    // Hash Table Configuration
    // -------------------------------------------------------------------------
    /// Requested bucket count; rounded up to the next prime
    pub initial_bucket_count: usize,

    /// Growth is triggered once `len / buckets` exceeds this value
    pub max_load_factor: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./rosterdb_data"),
            save_on_close: true,
            initial_bucket_count: 101,
            max_load_factor: 0.75,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the hash table cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.initial_bucket_count == 0 {
            return Err(RosterError::Config(
                "initial_bucket_count must be at least 1".to_string(),
            ));
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(RosterError::Config(format!(
                "max_load_factor must be a positive number, got {}",
                self.max_load_factor
            )));
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
    /// Set the data directory (root for all files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Save on close (default: true)
    pub fn save_on_close(mut self, enabled: bool) -> Self {
        self.config.save_on_close = enabled;
        self
    }

    /// Set the initial bucket count
    pub fn initial_bucket_count(mut self, count: usize) -> Self {
        self.config.initial_bucket_count = count;
        self
    }

    /// Set the load factor that triggers a rehash
    pub fn max_load_factor(mut self, factor: f64) -> Self {
        self.config.max_load_factor = factor;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
