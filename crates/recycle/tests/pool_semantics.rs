//! Acquire/release semantics of the object pool.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use recycle::{FactoryRegistry, ObjectPool, PoolConfig, PoolError};
use rstest::rstest;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Connection {
    id: usize,
}

fn counting_pool() -> (ObjectPool<Connection>, Arc<AtomicUsize>) {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&built);
    let pool = ObjectPool::new(move || Connection {
        id: counter.fetch_add(1, Ordering::SeqCst),
    });
    (pool, built)
}

// ---------------------------------------------------------------------------
// Free stack ordering
// ---------------------------------------------------------------------------

#[test]
fn released_instance_is_returned_by_next_acquire() {
    let (pool, built) = counting_pool();
    pool.release(Connection { id: 42 });

    assert_eq!(pool.acquire().unwrap().id, 42);
    assert_eq!(built.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case(vec![1])]
#[case(vec![1, 2])]
#[case(vec![3, 1, 4, 1, 5])]
fn acquires_come_back_in_reverse_release_order(#[case] ids: Vec<usize>) {
    let (pool, built) = counting_pool();
    for &id in &ids {
        pool.release(Connection { id });
    }

    let acquired: Vec<usize> = (0..ids.len()).map(|_| pool.acquire().unwrap().id).collect();
    let expected: Vec<usize> = ids.iter().rev().copied().collect();
    assert_eq!(acquired, expected);
    assert_eq!(built.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// Construction on demand
// ---------------------------------------------------------------------------

#[test]
fn try_acquire_on_empty_pool_builds_nothing() {
    let (pool, built) = counting_pool();

    assert!(pool.try_acquire().is_none());
    assert!(pool.try_acquire().is_none());
    assert_eq!(built.load(Ordering::SeqCst), 0);
}

#[test]
fn each_miss_builds_exactly_one_fresh_instance() {
    let (pool, built) = counting_pool();

    let first = pool.acquire().unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 1);
    let second = pool.acquire().unwrap();
    assert_eq!(built.load(Ordering::SeqCst), 2);

    assert_ne!(first.id, second.id);
    let stats = pool.stats().snapshot();
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.creations, 2);
}

#[test]
fn hit_after_miss_does_not_build() {
    let (pool, built) = counting_pool();

    let conn = pool.acquire().unwrap();
    pool.release(conn);
    let again = pool.acquire().unwrap();

    assert_eq!(again.id, 0);
    assert_eq!(built.load(Ordering::SeqCst), 1);
    assert_eq!(pool.stats().snapshot().hit_rate(), 0.5);
}

// ---------------------------------------------------------------------------
// Untyped pools
// ---------------------------------------------------------------------------

#[test]
fn untyped_pool_fails_to_allocate_when_empty() {
    let pool: ObjectPool<Connection> = ObjectPool::untyped();

    let err = pool.acquire().unwrap_err();
    assert!(matches!(err, PoolError::Allocation { .. }));
}

#[test]
fn untyped_pool_caches_heterogeneous_values() {
    let pool: ObjectPool<Box<dyn Any + Send>> = ObjectPool::default();
    pool.release(Box::new(7u32));
    pool.release(Box::new(String::from("text")));

    let top = pool.acquire().unwrap();
    assert_eq!(top.downcast_ref::<String>().map(String::as_str), Some("text"));
    let next = pool.acquire().unwrap();
    assert_eq!(next.downcast_ref::<u32>(), Some(&7));
    assert!(pool.acquire().is_err());
}

// ---------------------------------------------------------------------------
// Construction by type name
// ---------------------------------------------------------------------------

#[test]
fn unknown_type_name_fails_at_construction() {
    let registry = FactoryRegistry::new();

    let err = ObjectPool::<Connection>::from_registry(&registry, "db.Connection").unwrap_err();
    assert!(matches!(err, PoolError::Configuration { .. }));
    assert!(err.to_string().contains("db.Connection"));
}

#[test]
fn registered_type_name_builds_through_its_factory() {
    let mut registry = FactoryRegistry::new();
    registry.register("db.Connection", || Connection { id: 1000 });

    let pool = ObjectPool::<Connection>::from_registry(&registry, "db.Connection").unwrap();
    assert_eq!(pool.name(), "db.Connection");
    assert_eq!(pool.acquire().unwrap().id, 1000);
}

#[test]
fn registry_config_is_validated() {
    let mut registry = FactoryRegistry::new();
    registry.register_default::<String>();

    let config = PoolConfig::bounded(1).with_pre_warm(2);
    let err = ObjectPool::<String>::from_registry_with_config(
        &registry,
        std::any::type_name::<String>(),
        config,
    )
    .unwrap_err();
    assert!(err.is_configuration());
}

// ---------------------------------------------------------------------------
// Factory failures
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
#[error("no default constructor")]
struct NoConstructor;

#[test]
fn factory_failure_is_wrapped_without_retry() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let pool: ObjectPool<Connection> = ObjectPool::with_fallible_factory(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Err::<Connection, _>(NoConstructor)
    });

    let err = pool.acquire().unwrap_err();
    assert!(err.is_allocation());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let source = std::error::Error::source(&err).unwrap();
    assert!(source.downcast_ref::<NoConstructor>().is_some());
}

#[test]
fn failed_acquire_leaves_pool_usable() {
    let pool: ObjectPool<Connection> =
        ObjectPool::with_fallible_factory(|| Err::<Connection, _>(NoConstructor));

    assert!(pool.acquire().is_err());
    pool.release(Connection { id: 5 });
    assert_eq!(pool.acquire().unwrap().id, 5);
}

// ---------------------------------------------------------------------------
// Release contract
// ---------------------------------------------------------------------------

#[test]
fn release_does_not_deduplicate() {
    let pool = ObjectPool::untyped();
    let shared = Arc::new(1u8);
    pool.release(Arc::clone(&shared));
    pool.release(Arc::clone(&shared));

    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn guard_round_trip_keeps_lifo() {
    let (pool, _) = counting_pool();
    pool.release(Connection { id: 1 });

    {
        let guard = pool.acquire_guard().unwrap();
        assert_eq!(guard.id, 1);
    }
    assert_eq!(pool.try_acquire().map(|c| c.id), Some(1));
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[test]
fn operations_log_under_a_trace_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let pool: ObjectPool<Connection> =
        ObjectPool::with_config(PoolConfig::bounded(1).with_name("logged"), None).unwrap();
    pool.release(Connection { id: 1 });
    pool.release(Connection { id: 2 });
    assert_eq!(pool.acquire().unwrap().id, 1);
    assert!(pool.acquire().is_err());
}
