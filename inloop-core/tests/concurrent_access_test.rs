//! Concurrent storage access tests
//!
//! Several CLI invocations can share one data directory. These tests hammer
//! the storage adapters from many threads, each with its own store instance
//! where the adapter allows it, and check that every record left behind is
//! a complete value that one of the writers actually wrote.
//!
//! Run with: cargo test --test concurrent_access_test -- --nocapture

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

use tempfile::TempDir;

use inloop_core::adapters::duckdb::DuckDbStore;
use inloop_core::adapters::file::FileStore;
use inloop_core::ports::KeyValueStore;
use inloop_core::services::keys;
use inloop_core::{Account, Role};

/// Keep this realistic: a handful of processes at most
const THREAD_COUNT: usize = 6;

const ITERATIONS_PER_THREAD: usize = 20;

fn session_record(thread_id: usize, iteration: usize) -> String {
    let account = Account::new(
        format!("t{}-i{}", thread_id, iteration),
        format!("User {} {}", thread_id, iteration),
        &format!("user{}@campus.edu", thread_id),
        Role::Member,
    );
    serde_json::to_string(&account).unwrap()
}

/// Separate `FileStore` instances writing the same key must never leave a
/// torn record behind.
#[test]
fn test_file_store_concurrent_writers_same_key() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().join("storage"));

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let success_count = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let barrier = Arc::clone(&barrier);
            let dir = Arc::clone(&dir);
            let success_count = Arc::clone(&success_count);

            thread::spawn(move || {
                let store = FileStore::new(&dir).unwrap();
                barrier.wait();

                for i in 0..ITERATIONS_PER_THREAD {
                    store
                        .set(keys::CURRENT_SESSION, &session_record(thread_id, i))
                        .unwrap();
                    success_count.fetch_add(1, Ordering::SeqCst);

                    // Readers racing with writers see either nothing or a whole record
                    if let Some(raw) = store.get(keys::CURRENT_SESSION).unwrap() {
                        serde_json::from_str::<Account>(&raw)
                            .unwrap_or_else(|e| panic!("torn read: {} ({})", raw, e));
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    assert_eq!(
        success_count.load(Ordering::SeqCst),
        THREAD_COUNT * ITERATIONS_PER_THREAD
    );

    let store = FileStore::new(&dir).unwrap();
    let raw = store.get(keys::CURRENT_SESSION).unwrap().unwrap();
    let account: Account = serde_json::from_str(&raw).unwrap();
    assert!(account.id.ends_with(&format!("-i{}", ITERATIONS_PER_THREAD - 1)));

    // Temp files from the atomic writes must not show up as keys
    assert_eq!(store.keys().unwrap(), vec![keys::CURRENT_SESSION.to_string()]);
}

/// Writers on different keys do not clobber each other
#[test]
fn test_file_store_concurrent_writers_distinct_keys() {
    let temp_dir = TempDir::new().unwrap();
    let dir = Arc::new(temp_dir.path().to_path_buf());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT));

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let barrier = Arc::clone(&barrier);
            let dir = Arc::clone(&dir);
            thread::spawn(move || {
                let store = FileStore::new(&dir).unwrap();
                barrier.wait();
                for i in 0..ITERATIONS_PER_THREAD {
                    store
                        .set(&format!("record-{}", thread_id), &session_record(thread_id, i))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    let store = FileStore::new(&dir).unwrap();
    let mut found = store.keys().unwrap();
    found.sort();
    assert_eq!(found.len(), THREAD_COUNT);

    for thread_id in 0..THREAD_COUNT {
        let raw = store.get(&format!("record-{}", thread_id)).unwrap().unwrap();
        assert_eq!(raw, session_record(thread_id, ITERATIONS_PER_THREAD - 1));
    }
}

/// A shared `DuckDbStore` serializes writers on its connection
#[test]
fn test_duckdb_store_shared_across_threads() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("concurrent.duckdb");
    let store = Arc::new(DuckDbStore::new(&db_path).unwrap());

    let barrier = Arc::new(Barrier::new(THREAD_COUNT));
    let start = Instant::now();

    let handles: Vec<_> = (0..THREAD_COUNT)
        .map(|thread_id| {
            let barrier = Arc::clone(&barrier);
            let store = Arc::clone(&store);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ITERATIONS_PER_THREAD {
                    store
                        .set(keys::CURRENT_SESSION, &session_record(thread_id, i))
                        .unwrap();
                    store
                        .set(&format!("record-{}", thread_id), &session_record(thread_id, i))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }
    println!("duckdb writers finished in {:?}", start.elapsed());

    let raw = store.get(keys::CURRENT_SESSION).unwrap().unwrap();
    serde_json::from_str::<Account>(&raw).unwrap();
    assert_eq!(store.keys().unwrap().len(), THREAD_COUNT + 1);
    drop(store);

    // Everything is still there after reopening the file
    let reopened = DuckDbStore::new(&db_path).unwrap();
    for thread_id in 0..THREAD_COUNT {
        let raw = reopened.get(&format!("record-{}", thread_id)).unwrap().unwrap();
        assert_eq!(raw, session_record(thread_id, ITERATIONS_PER_THREAD - 1));
    }
}
