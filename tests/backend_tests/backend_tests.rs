//! Backend Tests
//!
//! Tests verify, for both backends:
//! - get / set / delete / ping semantics
//! - Lazy connection and reconnect after a dropped connection (RESP)
//! - Deadline handling (memory)
//! - Concurrent access

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use common::{closed_port, FakeOptions, FakeStore};
use kvdoc::{Deadline, KvBackend, KvDocError, MemoryBackend, RespBackend, StoreConfig};

// =============================================================================
// Shared Behaviour
// =============================================================================

fn exercise_basic_ops(backend: &dyn KvBackend) {
    let none = Deadline::none();

    assert_eq!(backend.get("a", none).unwrap(), None);

    backend.set("a", "1", none).unwrap();
    assert_eq!(backend.get("a", none).unwrap().as_deref(), Some("1"));

    backend.set("a", "2", none).unwrap();
    assert_eq!(backend.get("a", none).unwrap().as_deref(), Some("2"));

    assert!(backend.delete("a", none).unwrap());
    assert!(!backend.delete("a", none).unwrap());
    assert_eq!(backend.get("a", none).unwrap(), None);

    backend.ping(none).unwrap();
}

#[test]
fn test_memory_backend_basic_ops() {
    exercise_basic_ops(&MemoryBackend::new());
}

#[test]
fn test_resp_backend_basic_ops() {
    let server = FakeStore::start();
    exercise_basic_ops(&RespBackend::new(server.config()));
}

#[test]
fn test_arc_backend_delegates() {
    let backend = Arc::new(MemoryBackend::new());
    exercise_basic_ops(&backend);
    assert!(backend.is_empty());
}

// =============================================================================
// MemoryBackend Tests
// =============================================================================

#[test]
fn test_memory_len_tracks_keys() {
    let backend = MemoryBackend::new();
    assert!(backend.is_empty());

    backend.set("a", "1", Deadline::none()).unwrap();
    backend.set("b", "2", Deadline::none()).unwrap();
    backend.insert_raw("c", "raw");
    assert_eq!(backend.len(), 3);

    backend.delete("b", Deadline::none()).unwrap();
    assert_eq!(backend.len(), 2);
}

#[test]
fn test_memory_expired_deadline() {
    let backend = MemoryBackend::new();
    let expired = Deadline::after(Duration::from_millis(0));
    thread::sleep(Duration::from_millis(2));

    assert!(matches!(
        backend.set("a", "1", expired),
        Err(KvDocError::DeadlineExceeded)
    ));
    assert!(backend.is_empty());
    assert!(matches!(
        backend.get("a", expired),
        Err(KvDocError::DeadlineExceeded)
    ));
    assert!(matches!(
        backend.delete("a", expired),
        Err(KvDocError::DeadlineExceeded)
    ));
}

#[test]
fn test_memory_concurrent_writers_distinct_keys() {
    let backend = Arc::new(MemoryBackend::new());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let backend = Arc::clone(&backend);
            thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("t{}-{}", t, i);
                    backend.set(&key, &i.to_string(), Deadline::none()).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(backend.len(), 800);
}

// =============================================================================
// RespBackend Tests
// =============================================================================

#[test]
fn test_resp_backend_connects_lazily() {
    let server = FakeStore::start();
    let backend = RespBackend::new(server.config());

    assert!(!backend.is_connected());
    assert_eq!(server.connection_count(), 0);

    backend.ping(Deadline::none()).unwrap();
    assert!(backend.is_connected());

    backend.set("k", "v", Deadline::none()).unwrap();
    backend.get("k", Deadline::none()).unwrap();
    assert_eq!(server.connection_count(), 1);
}

#[test]
fn test_resp_backend_unreachable_reports_on_first_call() {
    let backend = RespBackend::new(StoreConfig::builder("127.0.0.1", closed_port()).build());

    let result = backend.get("k", Deadline::none());
    assert!(matches!(result, Err(KvDocError::ConnectionFailure(_))));
    assert!(!backend.is_connected());
}

#[test]
fn test_resp_backend_reconnects_after_timeout() {
    let server = FakeStore::start_with(FakeOptions {
        delay: Some(Duration::from_millis(300)),
        ..Default::default()
    });
    let backend = RespBackend::new(server.config());
    backend.ping(Deadline::none()).unwrap();

    let result = backend.get("k", Deadline::after(Duration::from_millis(30)));
    assert!(matches!(result, Err(KvDocError::DeadlineExceeded)));
    assert!(!backend.is_connected());

    // The late reply went to the dropped socket; a new one is opened
    assert_eq!(backend.get("k", Deadline::none()).unwrap(), None);
    assert_eq!(server.connection_count(), 2);
}

#[test]
fn test_resp_backend_expired_deadline_keeps_connection() {
    let server = FakeStore::start();
    let backend = RespBackend::new(server.config());
    backend.ping(Deadline::none()).unwrap();

    let expired = Deadline::after(Duration::from_millis(0));
    thread::sleep(Duration::from_millis(2));
    let result = backend.get("x", expired);
    assert!(matches!(result, Err(KvDocError::DeadlineExceeded)));
    assert!(backend.is_connected());

    backend.ping(Deadline::none()).unwrap();
    assert_eq!(server.connection_count(), 1);
}

#[test]
fn test_resp_backend_deadline_covers_wait_for_connection() {
    let server = FakeStore::start_with(FakeOptions {
        delay: Some(Duration::from_millis(1000)),
        ..Default::default()
    });
    let backend = Arc::new(RespBackend::new(server.config()));
    backend.ping(Deadline::none()).unwrap();

    let slow = {
        let backend = Arc::clone(&backend);
        thread::spawn(move || backend.get("k", Deadline::none()))
    };
    // Let the slow call take the connection first
    thread::sleep(Duration::from_millis(100));

    let started = Instant::now();
    let result = backend.get("k", Deadline::after(Duration::from_millis(50)));
    let waited = started.elapsed();

    assert!(matches!(result, Err(KvDocError::DeadlineExceeded)));
    assert!(waited < Duration::from_millis(500), "waited {:?}", waited);

    assert_eq!(slow.join().unwrap().unwrap(), None);
    assert!(backend.is_connected());
    assert_eq!(server.connection_count(), 1);
}

#[test]
fn test_resp_backend_rejected_write_keeps_connection() {
    let server = FakeStore::start_with(FakeOptions {
        reject_writes: Some("OOM command not allowed".to_string()),
        ..Default::default()
    });
    let backend = RespBackend::new(server.config());

    let result = backend.set("k", "v", Deadline::none());
    assert!(matches!(result, Err(KvDocError::StoreRejected(ref m)) if m.starts_with("OOM")));
    assert!(backend.is_connected());
    assert_eq!(server.connection_count(), 1);
}

#[test]
fn test_resp_backend_non_utf8_value() {
    let server = FakeStore::start();
    server.raw_set("bin", &[0xff, 0xfe, 0x00]);
    let backend = RespBackend::new(server.config());

    let result = backend.get("bin", Deadline::none());
    assert!(matches!(result, Err(KvDocError::MalformedRecord(_))));
}

#[test]
fn test_resp_backend_shared_across_threads() {
    let server = FakeStore::start();
    let backend = Arc::new(RespBackend::new(server.config()));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let backend = Arc::clone(&backend);
            thread::spawn(move || {
                for i in 0..25 {
                    let key = format!("t{}-{}", t, i);
                    backend.set(&key, "x", Deadline::none()).unwrap();
                    assert_eq!(backend.get(&key, Deadline::none()).unwrap().as_deref(), Some("x"));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(server.data.lock().len(), 100);
    assert_eq!(server.connection_count(), 1);
}
