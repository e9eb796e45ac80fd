use refresco::{wrap, CacheConfig, EventKind};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
struct FetchError(String);

fn no_sweep(name: &str) -> CacheConfig {
    CacheConfig::new(name).with_refresh_interval(Duration::ZERO)
}

#[tokio::test]
async fn test_listener_receives_encoded_key() {
    let cache = wrap(
        |(n,): (u32,)| async move { Ok::<u32, FetchError>(n) },
        no_sweep("keyed"),
    );
    let seen = Arc::new(Mutex::new(None));
    let slot = seen.clone();
    cache.on(EventKind::EntryAdded, move |event| {
        *slot.lock().unwrap() = event.key().map(str::to_string);
    });

    cache.call((42,)).await.unwrap();
    assert_eq!(seen.lock().unwrap().as_deref(), Some("42"));
}

#[tokio::test]
async fn test_once_listener_fires_for_a_single_delivery() {
    let cache = wrap(
        |(n,): (u32,)| async move { Ok::<u32, FetchError>(n) },
        no_sweep("one-shot"),
    );
    let found = Arc::new(AtomicU32::new(0));
    let counter = found.clone();
    cache.once(EventKind::EntryFound, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    cache.call((1,)).await.unwrap();
    cache.call((1,)).await.unwrap();
    cache.call((1,)).await.unwrap();

    assert_eq!(found.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_remove_listener_stops_deliveries() {
    let cache = wrap(
        |(n,): (u32,)| async move { Ok::<u32, FetchError>(n) },
        no_sweep("unsubscribed"),
    );
    let added = Arc::new(AtomicU32::new(0));
    let counter = added.clone();
    let id = cache.on(EventKind::EntryAdded, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    cache.call((1,)).await.unwrap();
    assert!(cache.remove_listener(id));
    cache.call((2,)).await.unwrap();

    assert_eq!(added.load(Ordering::SeqCst), 1);
    // A second removal of the same handle reports it was already gone.
    assert!(!cache.remove_listener(id));
}

#[tokio::test]
async fn test_bulk_unsubscribe_by_kind_and_outright() {
    let cache = wrap(
        |(n,): (u32,)| async move { Ok::<u32, FetchError>(n) },
        no_sweep("bulk"),
    );
    let added = Arc::new(AtomicU32::new(0));
    let cleared = Arc::new(AtomicU32::new(0));

    let counter = added.clone();
    cache.on(EventKind::EntryAdded, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = cleared.clone();
    cache.on(EventKind::CacheCleared, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    cache.remove_all_listeners(Some(EventKind::EntryAdded));
    cache.call((1,)).await.unwrap();
    cache.clear();

    // Only the added-listener was dropped; the cleared-listener survived.
    assert_eq!(added.load(Ordering::SeqCst), 0);
    assert_eq!(cleared.load(Ordering::SeqCst), 1);

    cache.remove_all_listeners(None);
    cache.clear();
    assert_eq!(cleared.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_clear_fires_even_on_empty_store() {
    let cache = wrap(
        |(): ()| async move { Ok::<u32, FetchError>(1) },
        no_sweep("empty"),
    );
    let cleared = Arc::new(AtomicU32::new(0));
    let counter = cleared.clone();
    cache.on(EventKind::CacheCleared, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    cache.clear();
    cache.clear();
    assert_eq!(cleared.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_error_event_carries_failure_and_key() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let cache = wrap(
        move |(n,): (u32,)| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Ok::<u32, FetchError>(n)
                } else {
                    Err(FetchError("boom".to_string()))
                }
            }
        },
        CacheConfig::new("error-payload")
            .with_ttl(Duration::from_millis(50))
            .with_refresh_interval(Duration::from_millis(25))
            .with_max_age(Duration::from_secs(3600)),
    );
    let captured = Arc::new(Mutex::new(None));
    let slot = captured.clone();
    cache.on(EventKind::EntryError, move |event| {
        if let refresco::CacheEvent::EntryError { key, error } = event {
            *slot.lock().unwrap() = Some((key.clone(), error.to_string()));
        }
    });

    cache.call((9,)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    cache.call((9,)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;

    let captured = captured.lock().unwrap();
    assert_eq!(
        captured.as_ref(),
        Some(&("9".to_string(), "boom".to_string()))
    );
}

#[cfg(feature = "stats")]
#[tokio::test]
async fn test_stats_count_refreshes_and_failures() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let cache = wrap(
        move |(): ()| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Ok::<u32, FetchError>(1)
                } else {
                    Err(FetchError("down".to_string()))
                }
            }
        },
        CacheConfig::new("refresh-stats")
            .with_ttl(Duration::from_millis(50))
            .with_refresh_interval(Duration::from_millis(25))
            .with_max_age(Duration::from_secs(3600)),
    );

    cache.call(()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    cache.call(()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(40)).await;

    assert_eq!(cache.stats().refreshes(), 1);
    assert_eq!(cache.stats().refresh_failures(), 1);
    assert_eq!(cache.stats().hits(), 1);
    assert_eq!(cache.stats().misses(), 1);
}
