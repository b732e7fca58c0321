//! KeyedStore implementation
//!
//! Separately-chained hash table behind a single mutex.

use std::mem;
use std::ptr;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Result, ValidationError};
use crate::log::{LogLevel, Logger, TracingLogger};
use crate::record::{Record, SearchCriteria};
use crate::validate::{StandardRules, Validator};

use super::hash::{bucket_index, next_prime};
use super::TableStats;

/// Requested bucket count when none is given
pub const DEFAULT_BUCKET_COUNT: usize = 17;

/// Load factor above which an insert triggers a rehash
pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;

/// Bucket array plus element count; only ever touched under the store lock
///
/// Each chain is a `Vec` whose *last* element is the chain head, so "insert
/// at head" is a push and traversal walks the vec in reverse.
#[derive(Debug)]
struct Buckets {
    chains: Vec<Vec<Record>>,
    len: usize,
}

impl Buckets {
    fn new(requested: usize) -> Self {
        let count = next_prime(requested);
        Self {
            chains: (0..count).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    fn bucket_count(&self) -> usize {
        self.chains.len()
    }

    fn load_factor(&self) -> f64 {
        self.len as f64 / self.bucket_count() as f64
    }

    /// (bucket, slot) of `id`, if present
    fn position(&self, id: &str) -> Option<(usize, usize)> {
        let bucket = bucket_index(id, self.bucket_count());
        self.chains[bucket]
            .iter()
            .position(|r| r.id == id)
            .map(|slot| (bucket, slot))
    }

    /// Add at chain head unless the id is already present
    fn insert_unique(&mut self, record: Record) -> bool {
        let bucket = bucket_index(&record.id, self.bucket_count());
        let chain = &mut self.chains[bucket];
        if chain.iter().any(|r| r.id == record.id) {
            return false;
        }
        chain.push(record);
        self.len += 1;
        true
    }

    /// Grow to the next prime ≥ 2 × current and redistribute every entry
    fn rehash(&mut self) {
        let target = self.bucket_count() * 2;
        let old = mem::replace(self, Buckets::new(target));
        let expected = old.len;
        for chain in old.chains {
            // Head first, as a linked traversal would consume it
            for record in chain.into_iter().rev() {
                let inserted = self.insert_unique(record);
                debug_assert!(inserted, "rehash met a duplicate key");
            }
        }
        debug_assert_eq!(self.len, expected);
    }

    /// Bucket order, then chain order from head
    fn iter(&self) -> impl Iterator<Item = &Record> {
        self.chains.iter().flat_map(|chain| chain.iter().rev())
    }

    /// First record that `validator` rejects, in traversal order
    fn check(&self, validator: &dyn Validator) -> std::result::Result<(), ValidationError> {
        self.iter().try_for_each(|r| validator.validate(r))
    }
}

/// Thread-safe keyed record store
///
/// ## Concurrency:
/// - One `parking_lot::Mutex` guards the bucket array, the element count,
///   and every record. Reads take it too, so a search never observes a
///   half-finished insert, remove, update, or rehash.
/// - All methods take `&self`; share the store with `Arc<KeyedStore>`.
///
/// ## Ownership:
/// - The store owns its records. `find`, `search`, and `get_all` hand out
///   clones; changes go back in through `update`.
pub struct KeyedStore {
    table: Mutex<Buckets>,
    initial_bucket_count: usize,
    max_load_factor: f64,
    validator: Arc<dyn Validator>,
    logger: Arc<dyn Logger>,
}

impl KeyedStore {
    /// Store with the default bucket count, standard rules, and tracing logger
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Store whose bucket count is the next prime ≥ `requested`
    pub fn with_buckets(requested: usize) -> Self {
        Self::builder().buckets(requested).build()
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    /// A fresh, empty store with this store's options and capabilities
    pub fn empty_like(&self) -> Self {
        Self::builder()
            .buckets(self.initial_bucket_count)
            .max_load_factor(self.max_load_factor)
            .validator(Arc::clone(&self.validator))
            .logger(Arc::clone(&self.logger))
            .build()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a copy of `record`
    ///
    /// Returns:
    /// - `Ok(true)`: inserted
    /// - `Ok(false)`: a record with this id already exists; nothing changed
    /// - `Err(Invalid)`: the record failed validation; nothing changed
    pub fn insert(&self, record: Record) -> Result<bool> {
        let mut table = self.table.lock();

        if let Err(e) = self.validator.validate(&record) {
            self.logger.log(
                LogLevel::Error,
                &format!("Employee validation failed: {}", e),
            );
            return Err(e.into());
        }

        let id = record.id.clone();
        if !table.insert_unique(record) {
            self.logger.log(
                LogLevel::Warning,
                &format!("Duplicate employee ID attempted: {}", id),
            );
            return Ok(false);
        }

        self.logger
            .log(LogLevel::Info, &format!("Employee inserted: {}", id));

        if table.load_factor() > self.max_load_factor {
            self.logger.log(
                LogLevel::Info,
                &format!(
                    "Rehashing hash table, current load factor: {:.6}",
                    table.load_factor()
                ),
            );
            table.rehash();
            self.logger.log(
                LogLevel::Info,
                &format!(
                    "Rehashing completed, new bucket count: {}",
                    table.bucket_count()
                ),
            );
        }

        Ok(true)
    }

    /// Remove the record with `id`; false if absent. Never shrinks the table.
    pub fn remove(&self, id: &str) -> bool {
        let mut table = self.table.lock();

        match table.position(id) {
            Some((bucket, slot)) => {
                table.chains[bucket].remove(slot);
                table.len -= 1;
                self.logger
                    .log(LogLevel::Info, &format!("Employee removed: {}", id));
                true
            }
            None => {
                self.logger.log(
                    LogLevel::Warning,
                    &format!("Employee not found for removal: {}", id),
                );
                false
            }
        }
    }

    /// Replace the record stored under `id`
    ///
    /// The stored hire timestamp is kept; every other field comes from
    /// `record`, whose id must equal `id`.
    ///
    /// Returns:
    /// - `Ok(true)`: replaced
    /// - `Ok(false)`: no record with this id
    /// - `Err(Invalid)`: `record` failed validation; stored record untouched
    pub fn update(&self, id: &str, record: Record) -> Result<bool> {
        let mut table = self.table.lock();

        let Some((bucket, slot)) = table.position(id) else {
            self.logger.log(
                LogLevel::Warning,
                &format!("Employee not found for update: {}", id),
            );
            return Ok(false);
        };

        let checked = if record.id != id {
            Err(ValidationError::IdMismatch {
                expected: id.to_string(),
                found: record.id.clone(),
            })
        } else {
            self.validator.validate(&record)
        };
        if let Err(e) = checked {
            self.logger.log(
                LogLevel::Error,
                &format!("Employee update validation failed: {}", e),
            );
            return Err(e.into());
        }

        let stored = &mut table.chains[bucket][slot];
        let hired_at = stored.hired_at;
        *stored = Record { hired_at, ..record };

        self.logger
            .log(LogLevel::Info, &format!("Employee updated: {}", id));
        Ok(true)
    }

    /// Drop every record and return to the initial bucket count
    pub fn clear(&self) {
        let mut table = self.table.lock();
        *table = Buckets::new(self.initial_bucket_count);
        self.logger.log(LogLevel::Info, "All employee records cleared");
    }

    /// Exchange the contents of two stores atomically
    ///
    /// Both locks are taken lowest address first, so two threads swapping
    /// the same pair in opposite directions cannot deadlock. Options and
    /// capabilities stay with their store, so each side's records must pass
    /// the other store's validator.
    ///
    /// Returns:
    /// - `Ok(())`: contents exchanged
    /// - `Err(Invalid)`: a record failed the receiving store's rules;
    ///   neither store changed
    pub fn swap(&self, other: &KeyedStore) -> Result<()> {
        if ptr::eq(self, other) {
            return Ok(());
        }
        let (first, second) = if (self as *const Self) < (other as *const Self) {
            (self, other)
        } else {
            (other, self)
        };
        let mut a = first.table.lock();
        let mut b = second.table.lock();

        let checked = b
            .check(first.validator.as_ref())
            .and_then(|()| a.check(second.validator.as_ref()));
        if let Err(e) = checked {
            self.logger
                .log(LogLevel::Error, &format!("Store swap rejected: {}", e));
            return Err(e.into());
        }

        mem::swap(&mut *a, &mut *b);
        Ok(())
    }

    /// Adopt `other`'s contents, discarding this store's, in one step
    ///
    /// Every incoming record is checked against this store's validator
    /// first; on `Err(Invalid)` this store is left as it was.
    pub fn replace_with(&self, other: KeyedStore) -> Result<()> {
        let incoming = other.table.into_inner();
        if let Err(e) = incoming.check(self.validator.as_ref()) {
            self.logger.log(
                LogLevel::Error,
                &format!("Store replacement rejected: {}", e),
            );
            return Err(e.into());
        }

        let count = incoming.len;
        *self.table.lock() = incoming;
        self.logger.log(
            LogLevel::Info,
            &format!("Store contents replaced ({} records)", count),
        );
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Clone of the record stored under `id`
    pub fn find(&self, id: &str) -> Option<Record> {
        let table = self.table.lock();
        table
            .position(id)
            .map(|(bucket, slot)| table.chains[bucket][slot].clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.table.lock().position(id).is_some()
    }

    /// Clones of every record matching `criteria`, in bucket-then-chain
    /// order (not id order)
    pub fn search(&self, criteria: &SearchCriteria) -> Vec<Record> {
        let table = self.table.lock();
        let results: Vec<Record> = table
            .iter()
            .filter(|r| criteria.matches(r))
            .cloned()
            .collect();
        self.logger.log(
            LogLevel::Debug,
            &format!("Search completed, found {} results", results.len()),
        );
        results
    }

    /// Clones of every record, in traversal order
    pub fn get_all(&self) -> Vec<Record> {
        self.search(&SearchCriteria::new())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn len(&self) -> usize {
        self.table.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.table.lock().bucket_count()
    }

    pub fn load_factor(&self) -> f64 {
        self.table.lock().load_factor()
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    pub fn statistics(&self) -> TableStats {
        let table = self.table.lock();
        TableStats::from_chain_lengths(table.chains.iter().map(Vec::len))
    }

    /// The validator this store checks records against
    pub fn validator(&self) -> &dyn Validator {
        self.validator.as_ref()
    }
}

impl Default for KeyedStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`KeyedStore`]
pub struct StoreBuilder {
    buckets: usize,
    max_load_factor: f64,
    validator: Arc<dyn Validator>,
    logger: Arc<dyn Logger>,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        Self {
            buckets: DEFAULT_BUCKET_COUNT,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            validator: Arc::new(StandardRules),
            logger: Arc::new(TracingLogger),
        }
    }
}

impl StoreBuilder {
    /// Requested bucket count (rounded up to a prime)
    pub fn buckets(mut self, requested: usize) -> Self {
        self.buckets = requested;
        self
    }

    /// Growth threshold; anything not finite and positive falls back to
    /// [`DEFAULT_MAX_LOAD_FACTOR`] at `build`
    pub fn max_load_factor(mut self, factor: f64) -> Self {
        self.max_load_factor = factor;
        self
    }

    pub fn validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn build(self) -> KeyedStore {
        let table = Buckets::new(self.buckets);
        self.logger.log(
            LogLevel::Info,
            &format!(
                "Hash table initialized with {} buckets",
                table.bucket_count()
            ),
        );

        let max_load_factor = if self.max_load_factor.is_finite() && self.max_load_factor > 0.0 {
            self.max_load_factor
        } else {
            self.logger.log(
                LogLevel::Warning,
                &format!(
                    "Invalid max load factor {}, using {}",
                    self.max_load_factor, DEFAULT_MAX_LOAD_FACTOR
                ),
            );
            DEFAULT_MAX_LOAD_FACTOR
        };

        KeyedStore {
            table: Mutex::new(table),
            initial_bucket_count: self.buckets,
            max_load_factor,
            validator: self.validator,
            logger: self.logger,
        }
    }
}
