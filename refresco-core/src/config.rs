use std::time::Duration;

/// Configuration for one decorated operation instance.
///
/// The defaults mirror a service-call cache: values are fresh for a minute,
/// retained for up to ten hours once stale, swept every ten seconds and
/// capped at ten thousand records.
///
/// Setting `refresh_interval` to zero disables the background sweep
/// entirely: entries then never go stale and never age out, and only an
/// explicit [`clear`](crate::Memoized::clear) removes them. That trade-off
/// is deliberate: without a sweep there is no time-based enforcement at all.
///
/// No validation is performed here; nonsensical combinations (a `ttl`
/// larger than `max_age`, a zero `max_records`) are the caller's concern.
///
/// # Examples
///
/// ```
/// use refresco_core::CacheConfig;
/// use std::time::Duration;
///
/// let config = CacheConfig::new("user-profiles")
///     .with_ttl(Duration::from_secs(30))
///     .with_max_records(500);
///
/// assert_eq!(config.name, "user-profiles");
/// assert_eq!(config.ttl, Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Label used in log records and diagnostics.
    pub name: String,
    /// Freshness window: entries older than this go stale at the next sweep.
    pub ttl: Duration,
    /// Absolute retention ceiling, measured from insertion, applied to
    /// entries that are already stale.
    pub max_age: Duration,
    /// Sweep period. Zero disables background sweeping.
    pub refresh_interval: Duration,
    /// Record capacity; the oldest insertions are evicted past this.
    pub max_records: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            ttl: Duration::from_secs(60),
            max_age: Duration::from_secs(10 * 60 * 60),
            refresh_interval: Duration::from_secs(10),
            max_records: 10_000,
        }
    }
}

impl CacheConfig {
    /// Creates a config with the given name and default windows.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the freshness window.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the absolute retention ceiling.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Sets the sweep period. Zero disables background sweeping.
    pub fn with_refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    /// Sets the record capacity.
    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = max_records;
        self
    }
}
