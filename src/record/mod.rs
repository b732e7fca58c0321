//! Record Module
//!
//! The value type held by the store.
//!
//! ## Contents
//! - `Record` and its validating builder
//! - `Department`, `Status`, `AccessLevel` with fixed ordinals
//! - `SearchCriteria` for predicate scans

mod criteria;
mod employee;
mod kinds;

pub use criteria::SearchCriteria;
pub use employee::{Record, RecordBuilder};
pub use kinds::{AccessLevel, Department, Status};
