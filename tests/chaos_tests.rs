//! Chaos testing for concurrent store access.
//!
//! Hammers one store from many threads and checks that:
//! - No operation deadlocks
//! - Ids stay unique under racing inserts
//! - The file on disk always matches memory once the dust settles

// Chaos tests use expect/unwrap/panic for simplicity - panics are acceptable in tests
// Excessive nesting is acceptable in concurrent test code with thread spawns
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::excessive_nesting
)]

use people_store::config::StoreConfig;
use people_store::{DataStore, JsonFileStore, Person, PersonRepository};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn shared_store(dir: &TempDir) -> Arc<JsonFileStore<Vec<Person>>> {
    let store = JsonFileStore::new(StoreConfig::new(dir.path()), Vec::new()).unwrap();
    store.initialize().unwrap();
    Arc::new(store)
}

fn read_back(dir: &TempDir) -> Vec<Person> {
    let fresh = JsonFileStore::new(StoreConfig::new(dir.path()), Vec::new()).unwrap();
    fresh.initialize().unwrap();
    fresh.select_all().unwrap()
}

/// Test: racing inserts of overlapping ids never duplicate.
#[test]
fn test_concurrent_inserts_stay_unique() {
    let dir = TempDir::new().unwrap();
    let store = shared_store(&dir);

    let num_threads = 8;
    let ids_per_thread = 25;

    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..ids_per_thread {
                    // Neighbouring threads share half their ids.
                    let id = format!("p-{}", t / 2 * ids_per_thread + i);
                    store
                        .insert(Person::with_id(id, format!("T{t}"), "Racer"))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let all = store.select_all().unwrap();
    let distinct: HashSet<_> = all.iter().map(|p| p.id.clone()).collect();
    assert_eq!(distinct.len(), all.len());
    assert_eq!(all.len(), num_threads / 2 * ids_per_thread);
    assert_eq!(read_back(&dir), all);
}

/// Test: mixed readers and writers finish and leave file equal to memory.
#[test]
fn test_mixed_workload_no_deadlock() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(StoreConfig::new(dir.path()), Vec::new()).unwrap();
    let repository = Arc::new(PersonRepository::new(store));
    repository.initialize().unwrap();

    let num_threads = 6;
    let ops_per_thread = 40;
    let completed = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let repository = Arc::clone(&repository);
            let completed = Arc::clone(&completed);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let id = format!("m-{t}-{}", i % 10);
                    match i % 5 {
                        0 | 1 => {
                            let _ = repository.create(Person::with_id(id, "Mixed", "Load"));
                        },
                        2 => {
                            let _ = repository.update(Person::with_id(id, "Changed", "Load"));
                        },
                        3 => {
                            let _ = repository.remove(&Person::with_id(id, "", ""));
                        },
                        _ => {
                            let _ = repository.get_all_sorted_by(|p| Some(p.first_name.as_str()));
                            let _ = repository.find_by(|p| p.last_name == "Load");
                        },
                    }
                    completed.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    let timeout = Duration::from_secs(30);
    let start = Instant::now();
    for handle in handles {
        handle.join().expect("Thread panicked");
        assert!(start.elapsed() < timeout, "Workload took too long");
    }

    assert_eq!(completed.load(Ordering::SeqCst), num_threads * ops_per_thread);

    let all = repository.get_all().unwrap();
    let distinct: HashSet<_> = all.iter().map(|p| p.id.clone()).collect();
    assert_eq!(distinct.len(), all.len());
    assert_eq!(read_back(&dir), all);
}
