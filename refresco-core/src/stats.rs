use std::sync::atomic::{AtomicU64, Ordering};

/// Per-cache access statistics.
///
/// Counters use atomic operations with `Relaxed` ordering: cheap to bump
/// from the lookup and refresh paths, safe to read from any thread. Each
/// cache instance owns its stats; there is no process-global registry.
///
/// Hits and misses follow the lookup outcome (`entry.found` /
/// `entry.notFound`); refreshes count background attempts triggered by
/// stale hits, and refresh failures the subset that ended in `entry.error`.
///
/// # Examples
///
/// ```
/// use refresco_core::CacheStats;
///
/// let stats = CacheStats::new();
/// stats.record_hit();
/// stats.record_hit();
/// stats.record_miss();
///
/// assert_eq!(stats.hits(), 2);
/// assert_eq!(stats.misses(), 1);
/// assert!((stats.hit_rate() - 0.6666).abs() < 0.001);
/// ```
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    refreshes: AtomicU64,
    refresh_failures: AtomicU64,
}

impl CacheStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_refresh_failure(&self) {
        self.refresh_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Lookups served from the store, fresh or stale.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that had to invoke the operation in the foreground.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Background refresh attempts triggered by stale hits.
    #[inline]
    pub fn refreshes(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    /// Background refresh attempts that failed.
    #[inline]
    pub fn refresh_failures(&self) -> u64 {
        self.refresh_failures.load(Ordering::Relaxed)
    }

    /// Total lookups observed.
    pub fn total_accesses(&self) -> u64 {
        self.hits().saturating_add(self.misses())
    }

    /// Ratio of hits to total lookups, `0.0` when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_accesses();
        if total == 0 {
            return 0.0;
        }
        self.hits() as f64 / total as f64
    }
}
