use std::sync::{Arc, Weak};
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::cache::Inner;
use crate::events::CacheEvent;

/// Spawns the periodic sweep task for `inner`.
///
/// Returns `None` when `refresh_interval` is zero: no background activity
/// exists then, entries never go stale and never age out, and only explicit
/// clears remove them.
///
/// The task holds a `Weak` handle only, so it cannot keep a discarded cache
/// alive; once the owner is gone the next tick ends the loop. The owner
/// additionally aborts the task on drop.
pub(crate) fn spawn<A, R, E>(inner: &Arc<Inner<A, R, E>>) -> Option<JoinHandle<()>>
where
    A: 'static,
    R: Send + 'static,
    E: 'static,
{
    let period = inner.config.refresh_interval;
    if period.is_zero() {
        return None;
    }

    let weak = Arc::downgrade(inner);
    Some(tokio::spawn(run(weak, period)))
}

async fn run<A, R, E>(weak: Weak<Inner<A, R, E>>, period: std::time::Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval completes immediately; consume it so a
    // pass only runs after a full period has elapsed.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let Some(inner) = weak.upgrade() else { break };
        sweep_once(&inner);
    }
}

/// One sweep pass: marks entries past the freshness window stale and
/// removes stale entries past the retention ceiling, then reports the
/// transitions in the order they happened.
///
/// The pass evaluates every entry against a single captured `now` inside
/// one critical section; events fire after the lock is released.
pub(crate) fn sweep_once<A, R, E>(inner: &Inner<A, R, E>) {
    let now = Instant::now();
    let outcome = {
        let mut store = inner.store.lock();
        store.sweep(now, inner.config.ttl, inner.config.max_age)
    };

    for key in outcome.expired {
        debug!(cache = %inner.config.name, %key, "entry.expired");
        inner.observer.notify(&CacheEvent::EntryExpired { key });
    }
    for key in outcome.removed {
        debug!(cache = %inner.config.name, %key, "entry.removed");
        inner.observer.notify(&CacheEvent::EntryRemoved { key });
    }
}
