//! Lifecycle events and the pub/sub collaborator that delivers them.
//!
//! The engine itself only depends on the [`Observer`] capability: something
//! that can be handed a [`CacheEvent`]. The bundled [`EventEmitter`] is one
//! such collaborator, supporting durable and one-shot listeners keyed by
//! [`EventKind`], per-listener removal and bulk removal.

use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Discriminant for the named lifecycle events.
///
/// `as_str` yields the wire name used in log records and matches the event
/// names of the decorated surface (`entry.added`, `cache.cleared`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A value was written for a key (first fetch or background refresh).
    EntryAdded,
    /// A lookup found an entry, fresh or stale.
    EntryFound,
    /// A lookup found no entry for its key.
    EntryNotFound,
    /// The sweep marked an entry stale.
    EntryExpired,
    /// An entry was removed by the sweep, by eviction or never by lookup.
    EntryRemoved,
    /// A background refresh failed; the cached value stays authoritative.
    EntryError,
    /// An insertion batch pushed the store past its record capacity.
    MaxRecordsReached,
    /// The whole store was cleared.
    CacheCleared,
}

impl EventKind {
    /// The dotted event name as exposed to subscribers and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::EntryAdded => "entry.added",
            EventKind::EntryFound => "entry.found",
            EventKind::EntryNotFound => "entry.notFound",
            EventKind::EntryExpired => "entry.expired",
            EventKind::EntryRemoved => "entry.removed",
            EventKind::EntryError => "entry.error",
            EventKind::MaxRecordsReached => "cache.maxRecordsReached",
            EventKind::CacheCleared => "cache.cleared",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A lifecycle notification with its payload.
///
/// Key-scoped events carry the encoded argument key; `EntryError`
/// additionally carries the failure of the background refresh that produced
/// it. Foreground (miss-path) failures never surface here; they propagate
/// as the decorated call's own error.
#[derive(Clone, Debug)]
pub enum CacheEvent {
    EntryAdded {
        key: String,
    },
    EntryFound {
        key: String,
    },
    EntryNotFound {
        key: String,
    },
    EntryExpired {
        key: String,
    },
    EntryRemoved {
        key: String,
    },
    EntryError {
        key: String,
        error: Arc<dyn Error + Send + Sync>,
    },
    MaxRecordsReached,
    CacheCleared,
}

impl CacheEvent {
    /// The discriminant this event dispatches under.
    pub fn kind(&self) -> EventKind {
        match self {
            CacheEvent::EntryAdded { .. } => EventKind::EntryAdded,
            CacheEvent::EntryFound { .. } => EventKind::EntryFound,
            CacheEvent::EntryNotFound { .. } => EventKind::EntryNotFound,
            CacheEvent::EntryExpired { .. } => EventKind::EntryExpired,
            CacheEvent::EntryRemoved { .. } => EventKind::EntryRemoved,
            CacheEvent::EntryError { .. } => EventKind::EntryError,
            CacheEvent::MaxRecordsReached => EventKind::MaxRecordsReached,
            CacheEvent::CacheCleared => EventKind::CacheCleared,
        }
    }

    /// The cache key this event is about, if it is key-scoped.
    pub fn key(&self) -> Option<&str> {
        match self {
            CacheEvent::EntryAdded { key }
            | CacheEvent::EntryFound { key }
            | CacheEvent::EntryNotFound { key }
            | CacheEvent::EntryExpired { key }
            | CacheEvent::EntryRemoved { key }
            | CacheEvent::EntryError { key, .. } => Some(key),
            CacheEvent::MaxRecordsReached | CacheEvent::CacheCleared => None,
        }
    }
}

/// The one capability the engine needs from its event collaborator.
///
/// Implementations must tolerate concurrent delivery: the sweep task and any
/// number of lookups may notify at the same time.
pub trait Observer: Send + Sync {
    /// Delivers one lifecycle notification.
    fn notify(&self, event: &CacheEvent);
}

/// Handle identifying a registered listener, used to unsubscribe it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(u64);

type Callback = Arc<dyn Fn(&CacheEvent) + Send + Sync>;

struct Listener {
    id: u64,
    kind: EventKind,
    once: bool,
    callback: Callback,
}

/// In-process pub/sub for cache lifecycle events.
///
/// Listeners are registered per [`EventKind`], either durably ([`on`]) or
/// for a single delivery ([`once`]). Delivery happens outside the internal
/// registry lock, so callbacks may re-enter the emitter (or the owning
/// cache surface) without deadlocking.
///
/// [`on`]: EventEmitter::on
/// [`once`]: EventEmitter::once
///
/// # Examples
///
/// ```
/// use refresco_core::events::{CacheEvent, EventEmitter, EventKind};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let emitter = EventEmitter::new();
/// let seen = Arc::new(AtomicUsize::new(0));
///
/// let counter = seen.clone();
/// emitter.on(EventKind::EntryAdded, move |_event| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// emitter.emit(&CacheEvent::EntryAdded { key: "k".to_string() });
/// emitter.emit(&CacheEvent::EntryRemoved { key: "k".to_string() });
///
/// assert_eq!(seen.load(Ordering::SeqCst), 1);
/// ```
pub struct EventEmitter {
    listeners: Mutex<Vec<Listener>>,
    next_id: AtomicU64,
}

impl EventEmitter {
    /// Creates an emitter with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    fn register(&self, kind: EventKind, once: bool, callback: Callback) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push(Listener {
            id,
            kind,
            once,
            callback,
        });
        ListenerId(id)
    }

    /// Registers a durable listener for `kind`.
    pub fn on<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        self.register(kind, false, Arc::new(callback))
    }

    /// Registers a one-shot listener for `kind`, removed on first delivery.
    pub fn once<F>(&self, kind: EventKind, callback: F) -> ListenerId
    where
        F: Fn(&CacheEvent) + Send + Sync + 'static,
    {
        self.register(kind, true, Arc::new(callback))
    }

    /// Unregisters a single listener. Returns whether it was still present.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|listener| listener.id != id.0);
        listeners.len() != before
    }

    /// Unregisters every listener for `kind`, or every listener outright
    /// when `kind` is `None`.
    pub fn remove_all_listeners(&self, kind: Option<EventKind>) {
        let mut listeners = self.listeners.lock();
        match kind {
            Some(kind) => listeners.retain(|listener| listener.kind != kind),
            None => listeners.clear(),
        }
    }

    /// Number of registered listeners, optionally restricted to one kind.
    pub fn listener_count(&self, kind: Option<EventKind>) -> usize {
        let listeners = self.listeners.lock();
        match kind {
            Some(kind) => listeners.iter().filter(|l| l.kind == kind).count(),
            None => listeners.len(),
        }
    }

    /// Delivers `event` to every listener registered for its kind.
    ///
    /// One-shot listeners are unregistered before their callback runs, so a
    /// racing emit on another thread cannot deliver to them twice.
    pub fn emit(&self, event: &CacheEvent) {
        let kind = event.kind();
        let matched: Vec<Callback> = {
            let mut listeners = self.listeners.lock();
            let matched = listeners
                .iter()
                .filter(|listener| listener.kind == kind)
                .map(|listener| Arc::clone(&listener.callback))
                .collect();
            listeners.retain(|listener| !(listener.once && listener.kind == kind));
            matched
        };

        for callback in matched {
            callback(event);
        }
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for EventEmitter {
    fn notify(&self, event: &CacheEvent) {
        self.emit(event);
    }
}
