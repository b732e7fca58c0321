//! Tests for concurrent access to KeyedStore
//!
//! These tests verify:
//! - Parallel inserts of distinct ids all land, across rehashes
//! - Parallel inserts of the same id admit exactly one
//! - Readers never observe a partially applied update
//! - Opposite-direction swaps do not deadlock

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use rosterdb::log::NullLogger;
use rosterdb::record::{Department, Record, SearchCriteria};
use rosterdb::table::KeyedStore;

// =============================================================================
// Helper Functions
// =============================================================================

fn shared_store(buckets: usize) -> Arc<KeyedStore> {
    Arc::new(
        KeyedStore::builder()
            .buckets(buckets)
            .logger(Arc::new(NullLogger))
            .build(),
    )
}

fn employee(id: &str, salary: f64) -> Record {
    Record::builder(id, "Test", "Person", "Analyst", Department::Operations, salary)
        .build()
        .unwrap()
}

// =============================================================================
// Concurrent Writes
// =============================================================================

#[test]
fn test_concurrent_distinct_inserts() {
    let store = shared_store(3);

    let mut handles = vec![];
    for t in 0..8 {
        let store_clone = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                let id = format!("T{}{:04}", (b'A' + t) as char, i);
                assert!(store_clone.insert(employee(&id, 1.0)).unwrap());
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 800);
    assert_eq!(store.get_all().len(), 800);
    for t in 0..8u8 {
        for i in 0..100 {
            assert!(store.contains(&format!("T{}{:04}", (b'A' + t) as char, i)));
        }
    }
}

#[test]
fn test_concurrent_duplicate_inserts_admit_one() {
    let store = shared_store(17);
    let admitted = Arc::new(AtomicUsize::new(0));

    let mut handles = vec![];
    for t in 0..8 {
        let store_clone = Arc::clone(&store);
        let admitted_clone = Arc::clone(&admitted);
        handles.push(thread::spawn(move || {
            if store_clone.insert(employee("AB1234", t as f64)).unwrap() {
                admitted_clone.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(admitted.load(Ordering::SeqCst), 1);
    assert_eq!(store.len(), 1);
}

// =============================================================================
// Readers vs Writers
// =============================================================================

#[test]
fn test_readers_see_whole_updates() {
    let store = shared_store(17);
    store.insert(employee("AB1234", 0.0)).unwrap();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 1..=500 {
                let mut r = store.find("AB1234").unwrap();
                r.salary = i as f64;
                r.position = if i % 2 == 0 { "Even".into() } else { "Odd".into() };
                store.update("AB1234", r).unwrap();
            }
        })
    };

    let mut readers = vec![];
    for _ in 0..4 {
        let store = Arc::clone(&store);
        readers.push(thread::spawn(move || {
            for _ in 0..500 {
                let r = store.find("AB1234").unwrap();
                let salary = r.salary as u64;
                if salary > 0 {
                    let expected = if salary % 2 == 0 { "Even" } else { "Odd" };
                    assert_eq!(r.position, expected);
                }
                let _ = store.search(&SearchCriteria::new().min_salary(0.0));
            }
        }));
    }

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.find("AB1234").unwrap().salary, 500.0);
}

// =============================================================================
// Swap
// =============================================================================

#[test]
fn test_opposite_swaps_do_not_deadlock() {
    let a = shared_store(17);
    let b = shared_store(17);
    a.insert(employee("AA0001", 1.0)).unwrap();
    b.insert(employee("BB0001", 2.0)).unwrap();
    b.insert(employee("BB0002", 3.0)).unwrap();

    let forward = {
        let (a, b) = (Arc::clone(&a), Arc::clone(&b));
        thread::spawn(move || {
            for _ in 0..1_000 {
                a.swap(&b).unwrap();
            }
        })
    };
    let backward = {
        let (a, b) = (Arc::clone(&a), Arc::clone(&b));
        thread::spawn(move || {
            for _ in 0..1_000 {
                b.swap(&a).unwrap();
            }
        })
    };
    forward.join().unwrap();
    backward.join().unwrap();

    // 2000 swaps: back where we started
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 2);
    assert!(a.contains("AA0001"));
}
