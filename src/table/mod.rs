//! Table Module
//!
//! The keyed store: an in-memory, separately-chained hash table.
//!
//! ## Responsibilities
//! - Insert/remove/update/find by unique id
//! - Predicate search by linear scan
//! - Growth: rehash into the next prime ≥ 2× buckets once the load factor
//!   passes 0.75
//! - Bucket occupancy statistics
//!
//! ## Layout
//! ```text
//! buckets (prime count)
//! ┌───┐
//! │ 0 │ → [head] → ... → [tail]
//! ├───┤
//! │ 1 │ → (empty)
//! ├───┤
//! │ 2 │ → [head] → [tail]
//! └───┘
//! bucket = fnv1a(id) % bucket_count
//! ```

pub mod hash;
mod stats;
mod store;

pub use stats::TableStats;
pub use store::{KeyedStore, StoreBuilder, DEFAULT_BUCKET_COUNT, DEFAULT_MAX_LOAD_FACTOR};
