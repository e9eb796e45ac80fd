use refresco::{wrap, CacheConfig, EventKind};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[error("{0}")]
struct FetchError(String);

/// Sweeping is irrelevant to these tests; disable it to keep them
/// time-independent.
fn no_sweep(name: &str) -> CacheConfig {
    CacheConfig::new(name).with_refresh_interval(Duration::ZERO)
}

#[tokio::test]
async fn test_repeated_call_is_served_from_cache() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let cache = wrap(
        move |(n,): (u32,)| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<u32, FetchError>(n * 2) }
        },
        no_sweep("double"),
    );

    assert_eq!(cache.call((21,)).await.unwrap(), 42);
    assert_eq!(cache.call((21,)).await.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_size_grows_per_distinct_key_only() {
    let cache = wrap(
        |(n,): (u32,)| async move { Ok::<u32, FetchError>(n) },
        no_sweep("identity"),
    );

    cache.call((1,)).await.unwrap();
    assert_eq!(cache.size(), 1);

    // Repeated hits on the same key do not grow the store.
    cache.call((1,)).await.unwrap();
    assert_eq!(cache.size(), 1);

    cache.call((2,)).await.unwrap();
    assert_eq!(cache.size(), 2);

    cache.clear();
    assert_eq!(cache.size(), 0);
}

#[tokio::test]
async fn test_name_reports_configured_label() {
    let cache = wrap(
        |(): ()| async move { Ok::<u32, FetchError>(1) },
        no_sweep("profiles"),
    );
    assert_eq!(cache.name(), "profiles");
}

#[tokio::test]
async fn test_zero_argument_operation_is_cached() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let cache = wrap(
        move |(): ()| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<u32, FetchError>(1) }
        },
        no_sweep("nullary"),
    );

    assert_eq!(cache.call(()).await.unwrap(), 1);
    assert_eq!(cache.call(()).await.unwrap(), 1);
    assert_eq!(cache.size(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_first_call_fires_not_found_then_added() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let cache = wrap(
        |(n,): (u32,)| async move { Ok::<u32, FetchError>(n) },
        no_sweep("observed"),
    );
    for kind in [
        EventKind::EntryNotFound,
        EventKind::EntryAdded,
        EventKind::EntryFound,
    ] {
        let log = events.clone();
        cache.on(kind, move |event| {
            log.lock().unwrap().push(event.kind().as_str());
        });
    }

    cache.call((5,)).await.unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec!["entry.notFound", "entry.added"]
    );

    cache.call((5,)).await.unwrap();
    assert_eq!(
        *events.lock().unwrap(),
        vec!["entry.notFound", "entry.added", "entry.found"]
    );
}

#[tokio::test]
async fn test_miss_failure_propagates_to_caller() {
    let cache = wrap(
        |(): ()| async move { Err::<u32, _>(FetchError("cause".to_string())) },
        no_sweep("failing"),
    );
    let errored = Arc::new(AtomicU32::new(0));
    let counter = errored.clone();
    cache.on(EventKind::EntryError, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let result = cache.call(()).await;
    assert_eq!(result, Err(FetchError("cause".to_string())));

    // The failure is the call's own failure: nothing is stored and the
    // entry.error channel stays silent (it is reserved for background
    // refresh failures).
    assert_eq!(cache.size(), 0);
    assert_eq!(errored.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let cache = wrap(
        move |(): ()| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Err::<u32, _>(FetchError("down".to_string())) }
        },
        no_sweep("flaky"),
    );

    assert!(cache.call(()).await.is_err());
    assert!(cache.call(()).await.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_clear_turns_next_lookup_into_miss() {
    let not_found = Arc::new(AtomicU32::new(0));
    let counter = not_found.clone();
    let cache = wrap(
        |(n,): (u32,)| async move { Ok::<u32, FetchError>(n) },
        no_sweep("cleared"),
    );
    cache.on(EventKind::EntryNotFound, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    cache.call((9,)).await.unwrap();
    cache.clear();
    cache.call((9,)).await.unwrap();

    assert_eq!(not_found.load(Ordering::SeqCst), 2);
}

#[cfg(feature = "stats")]
#[tokio::test]
async fn test_stats_track_hits_and_misses() {
    let cache = wrap(
        |(n,): (u32,)| async move { Ok::<u32, FetchError>(n) },
        no_sweep("counted"),
    );

    cache.call((1,)).await.unwrap();
    cache.call((1,)).await.unwrap();
    cache.call((2,)).await.unwrap();

    assert_eq!(cache.stats().misses(), 2);
    assert_eq!(cache.stats().hits(), 1);
    assert_eq!(cache.stats().total_accesses(), 3);
}
