//! Error types for RosterDB
//!
//! Provides a unified error type for all operations.
//!
//! Duplicate inserts and missing keys are not errors: the store reports them
//! as plain `bool`/`Option` outcomes so callers can tell "no-op" apart from
//! "rejected".

use thiserror::Error;

/// Result type alias using RosterError
pub type Result<T> = std::result::Result<T, RosterError>;

/// Unified error type for RosterDB operations
#[derive(Debug, Error)]
pub enum RosterError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Invalid record: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Decode error: {0}")]
    Decode(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// The field rule a record violated
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Invalid employee ID format: {0:?}")]
    InvalidId(String),

    #[error("Invalid name format: {0:?}")]
    InvalidName(String),

    #[error("Invalid position format: {0:?}")]
    InvalidPosition(String),

    #[error("Invalid salary range: {0}")]
    InvalidSalary(f64),

    #[error("Invalid email format: {0:?}")]
    InvalidEmail(String),

    #[error("Invalid phone format: {0:?}")]
    InvalidPhone(String),

    #[error("Invalid skill tag: {0:?}")]
    InvalidSkill(String),

    #[error("Invalid manager reference: {0:?}")]
    InvalidManager(String),

    #[error("Record ID {found} does not match key {expected}")]
    IdMismatch { expected: String, found: String },
}

/// Failure to parse an enumeration from its display name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}
