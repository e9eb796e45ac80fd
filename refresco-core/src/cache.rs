use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::events::{CacheEvent, EventEmitter, EventKind, ListenerId, Observer};
use crate::store::CacheStore;
#[cfg(feature = "stats")]
use crate::CacheStats;
use crate::{evictor, sweeper, CacheConfig, CacheKey};

type BoxedFuture<R, E> = Pin<Box<dyn Future<Output = Result<R, E>> + Send>>;
type BoxedOperation<A, R, E> = Arc<dyn Fn(A) -> BoxedFuture<R, E> + Send + Sync>;

/// Shared state behind one decorated operation: the store under its single
/// exclusive lock, the wrapped operation, and the event plumbing.
///
/// Engine components (lookup, sweep, eviction) notify through the
/// [`Observer`] capability only; the concrete [`EventEmitter`] is kept
/// separately so the subscription surface can reach it.
pub(crate) struct Inner<A, R, E> {
    pub(crate) config: CacheConfig,
    operation: BoxedOperation<A, R, E>,
    pub(crate) store: Mutex<CacheStore<R>>,
    emitter: Arc<EventEmitter>,
    pub(crate) observer: Arc<dyn Observer>,
    #[cfg(feature = "stats")]
    stats: CacheStats,
}

impl<A, R, E> Inner<A, R, E>
where
    A: Send + 'static,
    R: Clone + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Writes `value` under `key` and schedules the deferred capacity
    /// check.
    ///
    /// The check is a task posted behind the current unit of work rather
    /// than an inline pass, so a burst of writes is judged once against the
    /// final map size instead of once per write.
    pub(crate) fn insert(self: &Arc<Self>, key: String, value: R) {
        {
            let mut store = self.store.lock();
            store.insert(key.clone(), value, Instant::now());
        }
        debug!(cache = %self.config.name, %key, "entry.added");
        self.observer.notify(&CacheEvent::EntryAdded { key });
        evictor::schedule(Arc::clone(self));
    }

    /// Launches one independent background refresh for a stale hit.
    ///
    /// A success replaces the entry (clearing staleness and resetting its
    /// insertion time); a failure leaves the cached value untouched and is
    /// reported only through `entry.error`; the caller that triggered the
    /// refresh has already returned.
    fn spawn_refresh(inner: Arc<Self>, key: String, args: A) {
        tokio::spawn(async move {
            #[cfg(feature = "stats")]
            inner.stats.record_refresh();
            match (inner.operation)(args).await {
                Ok(value) => inner.insert(key, value),
                Err(error) => {
                    #[cfg(feature = "stats")]
                    inner.stats.record_refresh_failure();
                    debug!(cache = %inner.config.name, %key, error = %error, "entry.error");
                    inner.observer.notify(&CacheEvent::EntryError {
                        key,
                        error: Arc::new(error),
                    });
                }
            }
        });
    }

    fn clear(&self) {
        {
            let mut store = self.store.lock();
            store.clear();
        }
        debug!(cache = %self.config.name, "cache.cleared");
        self.observer.notify(&CacheEvent::CacheCleared);
    }
}

/// Decorates an asynchronous operation with an argument-keyed cache.
///
/// The returned [`Memoized`] serves repeated calls from its store, serves
/// stale values instantly while refreshing them in the background, sweeps
/// entries out past their maximum age and evicts the oldest insertions past
/// the record capacity, all per `config`.
///
/// Must be called from within a tokio runtime: the background sweep task is
/// spawned here (unless `config.refresh_interval` is zero), and lookups
/// spawn refresh and eviction-check tasks.
///
/// # Examples
///
/// ```ignore
/// use refresco_core::{wrap, CacheConfig};
///
/// let fetch_user = wrap(
///     |(id,): (u64,)| async move { api::fetch_user(id).await },
///     CacheConfig::new("users"),
/// );
///
/// // First call hits the API, second is served from the cache.
/// let user = fetch_user.call((42,)).await?;
/// let same = fetch_user.call((42,)).await?;
/// ```
pub fn wrap<F, Fut, A, R, E>(operation: F, config: CacheConfig) -> Memoized<A, R, E>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, E>> + Send + 'static,
    A: CacheKey + Send + 'static,
    R: Clone + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let operation: BoxedOperation<A, R, E> =
        Arc::new(move |args: A| -> BoxedFuture<R, E> { Box::pin(operation(args)) });
    let emitter = Arc::new(EventEmitter::new());
    let observer: Arc<dyn Observer> = emitter.clone();

    let inner = Arc::new(Inner {
        config,
        operation,
        store: Mutex::new(CacheStore::new()),
        emitter,
        observer,
        #[cfg(feature = "stats")]
        stats: CacheStats::new(),
    });

    let sweeper = sweeper::spawn(&inner);

    Memoized { inner, sweeper }
}

/// A cached asynchronous operation produced by [`wrap`].
///
/// # Lookup protocol
///
/// Each [`call`](Memoized::call) encodes its arguments into a key via
/// [`CacheKey`] and then:
///
/// - **miss**: fires `entry.notFound`, awaits the wrapped operation in the
///   foreground, stores and returns the value. A failure propagates
///   unmodified to the caller; nothing is stored and no cache event fires
///   for it.
/// - **fresh hit**: fires `entry.found` and returns a clone of the cached
///   value without invoking the operation.
/// - **stale hit**: fires `entry.found`, returns the cached value
///   immediately, and refreshes in the background. A refresh failure never
///   reaches any caller; it only fires `entry.error` and the last known
///   good value stays served.
///
/// Concurrent calls hitting the same stale entry each start their own
/// refresh; attempts are intentionally not deduplicated, and subscribers
/// observe one `entry.added` (or `entry.error`) per attempt.
///
/// # Lifecycle
///
/// `Memoized` owns its background sweep task: dropping the handle stops the
/// sweep. It is not `Clone`; wrap it in an `Arc` to share between tasks.
/// There is no cancellation of in-flight refreshes; one completing after
/// [`clear`](Memoized::clear) will still store its value.
pub struct Memoized<A, R, E> {
    inner: Arc<Inner<A, R, E>>,
    sweeper: Option<JoinHandle<()>>,
}

impl<A, R, E> Memoized<A, R, E>
where
    A: CacheKey + Send + 'static,
    R: Clone + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Invokes the decorated operation through the cache.
    ///
    /// Returns the cached or freshly fetched value, or the wrapped
    /// operation's own failure on the miss path.
    pub async fn call(&self, args: A) -> Result<R, E> {
        let key = args.cache_key();

        let hit = {
            let store = self.inner.store.lock();
            store
                .get(&key)
                .map(|entry| (entry.value.clone(), entry.stale))
        };

        match hit {
            Some((value, stale)) => {
                #[cfg(feature = "stats")]
                self.inner.stats.record_hit();
                debug!(cache = %self.inner.config.name, %key, "entry.found");
                self.inner
                    .observer
                    .notify(&CacheEvent::EntryFound { key: key.clone() });
                if stale {
                    Inner::spawn_refresh(Arc::clone(&self.inner), key, args);
                }
                Ok(value)
            }
            None => {
                #[cfg(feature = "stats")]
                self.inner.stats.record_miss();
                debug!(cache = %self.inner.config.name, %key, "entry.notFound");
                self.inner
                    .observer
                    .notify(&CacheEvent::EntryNotFound { key: key.clone() });

                let value = (self.inner.operation)(args).await?;
                self.inner.insert(key, value.clone());
                Ok(value)
            }
        }
    }

    /// Empties the store immediately and fires `cache.cleared` once.
    ///
    /// Does not abort refreshes already in flight; their results become
    /// visible again once they complete.
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Current live entry count.
    pub fn size(&self) -> usize {
        self.inner.store.lock().len()
    }

    /// The diagnostics label from the configuration.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// Subscribes a durable listener for `kind`.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        self.inner.emitter.on(kind, callback)
    }

    /// Subscribes a one-shot listener for `kind`.
    pub fn once<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        self.inner.emitter.once(kind, callback)
    }

    /// Unsubscribes a single listener.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.emitter.remove_listener(id)
    }

    /// Unsubscribes every listener for `kind`, or all listeners when
    /// `kind` is `None`.
    pub fn remove_all_listeners(&self, kind: Option<EventKind>) {
        self.inner.emitter.remove_all_listeners(kind)
    }

    /// Access statistics for this cache instance.
    #[cfg(feature = "stats")]
    pub fn stats(&self) -> &CacheStats {
        &self.inner.stats
    }
}

impl<A, R, E> Drop for Memoized<A, R, E> {
    fn drop(&mut self) {
        // The sweep task also only holds a Weak handle, but aborting here
        // releases the timer immediately instead of at its next tick.
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}
