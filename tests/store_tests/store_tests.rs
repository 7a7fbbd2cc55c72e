//! Tests for Store
//!
//! These tests verify:
//! - Basic get/put/delete operations
//! - Idempotent deletes
//! - Independent instances
//! - Linearizable access from many threads

use std::sync::{Arc, Barrier};
use std::thread;

use lankv::store::{Operation, Status};
use lankv::{LanKvError, Store};

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_store_put_get() {
    let store = Store::open().unwrap();

    store.put(b"hello".to_vec(), b"world".to_vec()).unwrap();

    assert_eq!(store.get(b"hello").unwrap(), b"world");
}

#[test]
fn test_store_get_nonexistent_key() {
    let store = Store::open().unwrap();

    assert!(matches!(store.get(b"nonexistent"), Err(LanKvError::KeyNotFound)));
}

#[test]
fn test_store_put_overwrites() {
    let store = Store::open().unwrap();

    store.put(b"key".to_vec(), b"v1".to_vec()).unwrap();
    store.put(b"key".to_vec(), b"v2".to_vec()).unwrap();

    assert_eq!(store.get(b"key").unwrap(), b"v2");
}

#[test]
fn test_store_delete_then_get() {
    let store = Store::open().unwrap();

    store.put(b"key".to_vec(), b"value".to_vec()).unwrap();
    store.delete(b"key").unwrap();

    assert!(matches!(store.get(b"key"), Err(LanKvError::KeyNotFound)));
}

#[test]
fn test_store_delete_absent_key_is_ok() {
    let store = Store::open().unwrap();

    store.delete(b"never-written").unwrap();
    store.delete(b"never-written").unwrap();
}

#[test]
fn test_store_empty_key_and_value() {
    let store = Store::open().unwrap();

    store.put(Vec::new(), Vec::new()).unwrap();

    assert_eq!(store.get(b"").unwrap(), Vec::<u8>::new());
}

#[test]
fn test_submit_reports_status() {
    let store = Store::open().unwrap();

    let response = store
        .submit(Operation::Get { key: b"missing".to_vec() })
        .unwrap();
    assert_eq!(response.status, Status::NotFound);
    assert_eq!(response.value, b"missing");

    let response = store
        .submit(Operation::Put { key: b"k".to_vec(), value: b"v".to_vec() })
        .unwrap();
    assert_eq!(response.status, Status::Ok);
}

#[test]
fn test_stores_are_independent() {
    let a = Store::open().unwrap();
    let b = Store::open().unwrap();

    a.put(b"shared".to_vec(), b"from a".to_vec()).unwrap();

    assert!(matches!(b.get(b"shared"), Err(LanKvError::KeyNotFound)));
}

#[test]
fn test_cloned_handles_share_state() {
    let store = Store::open().unwrap();
    let handle = store.clone();

    handle.put(b"key".to_vec(), b"value".to_vec()).unwrap();

    assert_eq!(store.get(b"key").unwrap(), b"value");
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_puts_same_key_yield_one_value() {
    let store = Store::open().unwrap();
    let barrier = Arc::new(Barrier::new(16));

    let values: Vec<Vec<u8>> = (0..16)
        .map(|i| format!("value-{:02}-{}", i, "x".repeat(i * 10)).into_bytes())
        .collect();

    let handles: Vec<_> = values
        .iter()
        .cloned()
        .map(|value| {
            let store = store.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                store.put(b"contended".to_vec(), value).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let result = store.get(b"contended").unwrap();
    assert!(values.contains(&result), "unexpected value {:?}", result);
}

#[test]
fn test_concurrent_writers_distinct_keys() {
    let store = Store::open().unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("t{}-k{}", t, i).into_bytes();
                    store.put(key, format!("{}", i).into_bytes()).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for t in 0..8 {
        for i in 0..100 {
            let key = format!("t{}-k{}", t, i).into_bytes();
            assert_eq!(store.get(&key).unwrap(), format!("{}", i).into_bytes());
        }
    }
}

#[test]
fn test_read_your_writes_per_thread() {
    let store = Store::open().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                let key = format!("own-{}", t).into_bytes();
                for i in 0..200u32 {
                    store.put(key.clone(), i.to_be_bytes().to_vec()).unwrap();
                    assert_eq!(store.get(&key).unwrap(), i.to_be_bytes());
                }
                store.delete(&key).unwrap();
                assert!(matches!(store.get(&key), Err(LanKvError::KeyNotFound)));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
