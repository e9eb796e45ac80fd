use std::time::{Duration, Instant};

/// Internal wrapper that tracks when a value was written and whether the
/// periodic sweep has marked it stale.
///
/// Each cached value is wrapped in a `CacheEntry` recording its insertion
/// timestamp. The staleness flag starts cleared and is only ever set by the
/// sweep; replacing the entry through a refresh or a fresh write produces a
/// new entry with a new `inserted_at`, which also resets its eligibility for
/// capacity eviction.
///
/// Both the freshness window and the absolute retention ceiling are measured
/// against `inserted_at`; going stale does not restart any clock.
///
/// # Examples
///
/// ```
/// use refresco_core::CacheEntry;
/// use std::time::{Duration, Instant};
///
/// let now = Instant::now();
/// let entry = CacheEntry::new(42, now);
///
/// assert_eq!(entry.value, 42);
/// assert!(!entry.stale);
/// assert_eq!(entry.age(now + Duration::from_secs(3)), Duration::from_secs(3));
/// ```
#[derive(Clone)]
pub struct CacheEntry<R> {
    pub value: R,
    pub inserted_at: Instant,
    pub stale: bool,
}

impl<R> CacheEntry<R> {
    /// Creates a fresh entry inserted at `now`.
    pub fn new(value: R, now: Instant) -> Self {
        Self {
            value,
            inserted_at: now,
            stale: false,
        }
    }

    /// Returns the entry age as observed at `now`.
    ///
    /// Saturates to zero when `now` predates the insertion, which can happen
    /// when a sweep captures its timestamp just before a concurrent write
    /// lands.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    /// Flags the entry as stale. Idempotent.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }
}
