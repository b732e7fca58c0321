//! # RosterDB
//!
//! A keyed employee record store with:
//! - A separately-chained hash table (FNV-1a, prime bucket counts, growth
//!   past load factor 0.75)
//! - Predicate search by linear scan
//! - Line-oriented persistence with backup-before-write and tolerant load
//! - A single table-wide lock for thread safety
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         CLI / caller                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                          Engine                              │
//! │          (save / reload / backup / restore / audit)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────────┐
//!   │ KeyedStore  │◄─────────│PersistenceManager│
//!   │   (Mutex)   │ get_all/ │ (employees.dat)  │
//!   └──────┬──────┘  insert  └──────────────────┘
//!          │
//!          ▼
//!   ┌─────────────┐
//!   │  Validator  │  Logger
//!   │ (injected)  │ (injected)
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod clock;
pub mod log;
pub mod validate;

pub mod record;
pub mod table;
pub mod persist;
pub mod report;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, RosterError, ValidationError};
pub use config::Config;
pub use engine::Engine;
pub use record::{AccessLevel, Department, Record, SearchCriteria, Status};
pub use table::KeyedStore;
pub use persist::{LoadReport, PersistenceManager};
pub use validate::{StandardRules, Validator};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of RosterDB
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
