//! Tests for the SafeMap handle
//!
//! These tests verify:
//! - Basic get/set/delete/exists/size/clear operations
//! - Full and early-break scans
//! - Reentrant calls from scan callbacks
//! - The end-to-end usage scenario

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use safemap::{Config, SafeMap, SafeMapError};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_map() -> SafeMap<String, i32> {
    SafeMap::new().unwrap()
}

fn key(s: &str) -> String {
    s.to_string()
}

fn setup_map_with_entries(count: i32) -> SafeMap<String, i32> {
    let map = setup_map();
    for i in 0..count {
        map.set(format!("key{}", i), i).unwrap();
    }
    map
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_get_on_empty_store() {
    let map = setup_map();

    assert_eq!(map.get(key("missing")).unwrap(), None);
    assert_eq!(map.size().unwrap(), 0);
}

#[test]
fn test_set_and_get() {
    let map = setup_map();

    map.set(key("hello"), 42).unwrap();

    assert_eq!(map.get(key("hello")).unwrap(), Some(42));
}

#[test]
fn test_set_overwrites_existing() {
    let map = setup_map();

    map.set(key("key"), 1).unwrap();
    map.set(key("key"), 2).unwrap();

    assert_eq!(map.get(key("key")).unwrap(), Some(2));
    assert_eq!(map.size().unwrap(), 1);
}

#[test]
fn test_delete() {
    let map = setup_map();

    map.set(key("key"), 7).unwrap();
    map.delete(key("key")).unwrap();

    assert_eq!(map.get(key("key")).unwrap(), None);
    assert_eq!(map.size().unwrap(), 0);
}

#[test]
fn test_delete_nonexistent_key() {
    let map = setup_map();

    // Should not error
    map.delete(key("nonexistent")).unwrap();
    assert_eq!(map.get(key("nonexistent")).unwrap(), None);
}

#[test]
fn test_exists_matches_get() {
    let map = setup_map();
    map.set(key("present"), 1).unwrap();

    for k in ["present", "absent"] {
        let found = map.get(key(k)).unwrap().is_some();
        assert_eq!(map.exists(key(k)).unwrap(), found);
    }
    assert!(map.exists(key("present")).unwrap());
    assert!(!map.exists(key("absent")).unwrap());
}

#[test]
fn test_size_tracks_entries() {
    let map = setup_map_with_entries(10);
    assert_eq!(map.size().unwrap(), 10);

    map.delete(key("key0")).unwrap();
    map.delete(key("key0")).unwrap();
    assert_eq!(map.size().unwrap(), 9);
}

#[test]
fn test_clear() {
    let map = setup_map_with_entries(5);

    map.clear().unwrap();

    assert_eq!(map.size().unwrap(), 0);
    assert_eq!(map.get(key("key1")).unwrap(), None);

    // Still usable after clear
    map.set(key("again"), 3).unwrap();
    assert_eq!(map.size().unwrap(), 1);
}

#[test]
fn test_clones_share_one_store() {
    let map = setup_map();
    let other = map.clone();

    map.set(key("shared"), 5).unwrap();

    assert_eq!(other.get(key("shared")).unwrap(), Some(5));
}

#[test]
fn test_usage_scenario() {
    let map = setup_map();

    map.set(key("a"), 1).unwrap();
    map.set(key("b"), 2).unwrap();
    assert_eq!(map.size().unwrap(), 2);
    assert_eq!(map.get(key("a")).unwrap(), Some(1));

    map.delete(key("a")).unwrap();
    assert_eq!(map.get(key("a")).unwrap(), None);
    assert!(map.exists(key("b")).unwrap());

    map.clear().unwrap();
    assert_eq!(map.size().unwrap(), 0);

    map.terminate().unwrap();
    assert!(matches!(map.get(key("b")), Err(SafeMapError::Closed)));
}

// =============================================================================
// Scan Tests
// =============================================================================

#[test]
fn test_for_each_visits_every_entry_once() {
    let map = setup_map_with_entries(50);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    map.for_each(move |k, v| sink.lock().push((k.clone(), *v)))
        .unwrap();

    let mut seen = seen.lock().clone();
    seen.sort_by_key(|(_, v)| *v);
    let expected: Vec<_> = (0..50).map(|i| (format!("key{}", i), i)).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_for_each_on_empty_store() {
    let map = setup_map();
    let calls = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&calls);
    map.for_each(move |_, _| *counter.lock() += 1).unwrap();

    assert_eq!(*calls.lock(), 0);
}

#[test]
fn test_for_each_until_stops_at_first_true() {
    let map = setup_map_with_entries(20);
    let visited = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&visited);
    map.for_each_until(move |_, v| {
        sink.lock().push(*v);
        *v == 7
    })
    .unwrap();

    let visited = visited.lock().clone();
    // Nothing is visited after the entry that returned true
    assert_eq!(visited.last(), Some(&7));
    assert_eq!(visited.iter().filter(|v| **v == 7).count(), 1);
    let unique: HashSet<_> = visited.iter().collect();
    assert_eq!(unique.len(), visited.len());
}

#[test]
fn test_for_each_until_true_immediately() {
    let map = setup_map_with_entries(20);
    let calls = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&calls);
    map.for_each_until(move |_, _| {
        *counter.lock() += 1;
        true
    })
    .unwrap();

    assert_eq!(*calls.lock(), 1);
}

#[test]
fn test_for_each_until_never_true_visits_all() {
    let map = setup_map_with_entries(20);
    let calls = Arc::new(Mutex::new(0));

    let counter = Arc::clone(&calls);
    map.for_each_until(move |_, _| {
        *counter.lock() += 1;
        false
    })
    .unwrap();

    assert_eq!(*calls.lock(), 20);
}

#[test]
fn test_scan_callback_runs_on_named_coordinator_thread() {
    let config = Config::builder().thread_name("scan-owner").build();
    let map: SafeMap<u8, u8> = SafeMap::with_config(config).unwrap();
    map.set(1, 1).unwrap();
    let names = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&names);
    map.for_each(move |_, _| {
        sink.lock().push(thread::current().name().map(str::to_string));
    })
    .unwrap();

    assert_eq!(*names.lock(), vec![Some("scan-owner".to_string())]);
    assert_ne!(thread::current().name(), Some("scan-owner"));
}

// =============================================================================
// Reentrancy Tests
// =============================================================================

#[test]
fn test_reentrant_get_is_rejected() {
    let map = setup_map_with_entries(1);
    let outcome = Arc::new(Mutex::new(None));

    let inner = map.clone();
    let sink = Arc::clone(&outcome);
    map.for_each(move |k, _| {
        *sink.lock() = Some(inner.get(k.clone()));
    })
    .unwrap();

    let outcome = outcome.lock().take().unwrap();
    assert!(matches!(outcome, Err(SafeMapError::ReentrantCall)));

    // The store is unaffected
    assert_eq!(map.get(key("key0")).unwrap(), Some(0));
}

#[test]
fn test_reentrant_terminate_is_rejected() {
    let map = setup_map_with_entries(1);
    let outcome = Arc::new(Mutex::new(None));

    let inner = map.clone();
    let sink = Arc::clone(&outcome);
    map.for_each_until(move |_, _| {
        *sink.lock() = Some(inner.terminate());
        true
    })
    .unwrap();

    let outcome = outcome.lock().take().unwrap();
    assert!(matches!(outcome, Err(SafeMapError::ReentrantCall)));
    assert!(!map.is_closed());
    assert_eq!(map.size().unwrap(), 1);
}
