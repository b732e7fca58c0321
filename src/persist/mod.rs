//! Persistence Module
//!
//! Line-oriented save/load of a whole store, plus a CSV projection.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ 3                                  (record count)   │
//! │ AA1111|Ada|Lovelace|Engineer|0|80000|...|0|...      │
//! │ BB2222|Grace|Hopper|Recruiter|1|60000|...|0|...     │
//! │ CC3333|...                                          │
//! │                                    (blank → stop)   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The count is advisory. Every record line is decoded on its own, so one
//! corrupt line costs one record, not the whole file.
//!
//! ## Backups
//! Before overwriting `employees.dat` the manager copies it to
//! `employees.dat.bak`. A crash mid-save can only damage the primary.

mod codec;
mod export;
mod manager;

pub use codec::{decode_record, encode_record, FIELD_DELIMITER, SKILL_DELIMITER};
pub use export::{csv_row, write_csv, CSV_HEADER};
pub use manager::{LoadReport, PersistenceManager, BACKUP_SUFFIX};
