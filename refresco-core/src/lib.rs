//! # Refresco Core
//!
//! Core engine for the Refresco caching decorator: an argument-keyed cache
//! for asynchronous operations that serves stale values instantly while
//! refreshing them in the background.
//!
//! ## Features
//!
//! - **Argument-keyed memoization**: results are cached per encoded
//!   argument tuple via the [`CacheKey`] trait
//! - **Stale-while-revalidate**: stale hits return the last known good
//!   value immediately and refresh behind the caller's back
//! - **Background sweep**: a periodic task marks entries stale past their
//!   freshness window and removes them past the retention ceiling
//! - **Capacity eviction**: oldest-insertion-first eviction once the store
//!   exceeds its record limit, decided by a deferred post-write check
//! - **Lifecycle events**: named notifications (`entry.added`,
//!   `entry.found`, `entry.error`, ...) with durable and one-shot listeners
//! - **Two failure channels**: miss-path failures propagate to the caller
//!   untouched; background refresh failures only ever surface as
//!   `entry.error` events
//! - **Statistics**: per-instance hit/miss/refresh counters (with the
//!   `stats` feature)
//!
//! ## Module Organization
//!
//! - [`key`](CacheKey) - argument-list-to-key encoding
//! - [`entry`](CacheEntry) - entry wrapper with insertion time and
//!   staleness flag
//! - [`config`](CacheConfig) - per-instance windows and limits
//! - [`events`] - lifecycle events, the [`Observer`] seam and the bundled
//!   [`EventEmitter`]
//! - [`wrap`] / [`Memoized`] - the decorated surface
//!
//! The store itself, the sweep task and the eviction check are internal:
//! they share one exclusive lock and are only reachable through the
//! decorated surface.

mod cache;
mod config;
mod entry;
mod evictor;
mod key;
mod store;
mod sweeper;

pub mod events;

#[cfg(feature = "stats")]
mod stats;

pub use cache::{wrap, Memoized};
pub use config::CacheConfig;
pub use entry::CacheEntry;
pub use events::{CacheEvent, EventEmitter, EventKind, ListenerId, Observer};
pub use key::CacheKey;

#[cfg(feature = "stats")]
pub use stats::CacheStats;
