use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::CacheEntry;

/// Keys touched by one sweep pass, in the order the transitions happened.
///
/// A key can appear in both lists within the same pass: an entry already
/// past the retention ceiling goes stale and is removed by the same sweep.
#[derive(Debug, Default)]
pub(crate) struct SweepOutcome {
    pub(crate) expired: Vec<String>,
    pub(crate) removed: Vec<String>,
}

/// Key-to-entry mapping owning the entry lifecycle transitions.
///
/// The store is deliberately not synchronized; the owning cache wraps it in
/// a single exclusive lock so that lookups, sweep passes and eviction passes
/// serialize against each other (the sweep and eviction passes iterate the
/// whole map and must not interleave with writes). Every operation here is a
/// synchronous, non-yielding unit of work.
///
/// Mutating passes return the affected keys instead of notifying anyone:
/// the owner emits lifecycle events after releasing the lock, so listener
/// callbacks can safely re-enter the cache surface.
pub(crate) struct CacheStore<R> {
    entries: HashMap<String, CacheEntry<R>>,
}

impl<R> CacheStore<R> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Pure read; no side effects on entry state.
    pub(crate) fn get(&self, key: &str) -> Option<&CacheEntry<R>> {
        self.entries.get(key)
    }

    /// Inserts or replaces the entry for `key`.
    ///
    /// Replacement is total: the new entry carries `inserted_at = now` and a
    /// cleared staleness flag, which also pushes the key to the back of the
    /// eviction order.
    pub(crate) fn insert(&mut self, key: String, value: R, now: Instant) {
        self.entries.insert(key, CacheEntry::new(value, now));
    }

    /// Deletes the entry if present. Absent keys are a no-op, not an error.
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Empties the whole store.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of live entries.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// One pass of the periodic sweep, evaluated against a single captured
    /// `now`.
    ///
    /// Per entry, independently:
    /// 1. not yet stale and `age >= ttl`: the staleness flag is set;
    /// 2. stale and `age >= max_age`: the entry is removed.
    ///
    /// Both windows are measured from `inserted_at`, never from the moment
    /// the entry went stale. Check 2 observes the flag set by check 1, so an
    /// entry past both windows transitions and disappears within one pass.
    /// An entry that is never marked stale (for example when `ttl` exceeds
    /// `max_age`) is never removed by age.
    pub(crate) fn sweep(&mut self, now: Instant, ttl: Duration, max_age: Duration) -> SweepOutcome {
        let mut outcome = SweepOutcome::default();

        for (key, entry) in self.entries.iter_mut() {
            if !entry.stale && entry.age(now) >= ttl {
                entry.mark_stale();
                outcome.expired.push(key.clone());
            }
            if entry.stale && entry.age(now) >= max_age {
                outcome.removed.push(key.clone());
            }
        }

        for key in &outcome.removed {
            self.remove(key);
        }

        outcome
    }

    /// Removes the entries with the oldest `inserted_at` until the store is
    /// back at `max_records`, returning the removed keys oldest-first.
    ///
    /// Returns `None` when the store is within capacity; ties on the
    /// insertion timestamp break by lexicographic key order so the selection
    /// is deterministic.
    pub(crate) fn evict_oldest_excess(&mut self, max_records: usize) -> Option<Vec<String>> {
        let excess = self.entries.len().saturating_sub(max_records);
        if excess == 0 {
            return None;
        }

        let mut by_age: Vec<(Instant, String)> = self
            .entries
            .iter()
            .map(|(key, entry)| (entry.inserted_at, key.clone()))
            .collect();
        by_age.sort();

        let victims: Vec<String> = by_age.into_iter().take(excess).map(|(_, key)| key).collect();
        for key in &victims {
            self.remove(key);
        }

        Some(victims)
    }
}
