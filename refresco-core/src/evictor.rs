use std::sync::Arc;

use tracing::debug;

use crate::cache::Inner;
use crate::events::CacheEvent;

/// Schedules one deferred capacity check after a write.
///
/// The check runs as its own task behind the current unit of work, and
/// decides from the map size it observes when it runs. A burst of writes
/// therefore queues several checks, but only the first to run sees the
/// excess and evicts; the rest find the store back at capacity and no-op,
/// yielding a single `cache.maxRecordsReached` per settling batch.
pub(crate) fn schedule<A, R, E>(inner: Arc<Inner<A, R, E>>)
where
    A: 'static,
    R: Send + 'static,
    E: 'static,
{
    tokio::spawn(async move {
        check_capacity(&inner);
    });
}

/// Removes the entries with the oldest insertion times once the store
/// exceeds its record capacity, reporting the overflow once and each
/// removal individually.
///
/// Ordering is oldest-insertion-first, not least-recently-used: a refresh
/// rewrites an entry's insertion time and thereby resets its eviction
/// eligibility.
pub(crate) fn check_capacity<A, R, E>(inner: &Inner<A, R, E>) {
    let victims = {
        let mut store = inner.store.lock();
        store.evict_oldest_excess(inner.config.max_records)
    };
    let Some(victims) = victims else { return };

    debug!(cache = %inner.config.name, "cache.maxRecordsReached");
    inner.observer.notify(&CacheEvent::MaxRecordsReached);

    for key in victims {
        debug!(cache = %inner.config.name, %key, "entry.removed");
        inner.observer.notify(&CacheEvent::EntryRemoved { key });
    }
}
