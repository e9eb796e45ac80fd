//! # Refresco
//!
//! An async memoization decorator with stale-while-revalidate semantics:
//! wrap an asynchronous operation once and repeated calls with equal
//! arguments are served from a cache that refreshes itself in the
//! background, sweeps out aged entries and evicts the oldest insertions
//! past a record cap.
//!
//! ## Quick Start
//!
//! ```rust
//! use refresco::{wrap, CacheConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let fetch = wrap(
//!         |(id,): (u32,)| async move {
//!             // Stand-in for a remote call.
//!             Ok::<String, std::io::Error>(format!("user-{id}"))
//!         },
//!         CacheConfig::new("users"),
//!     );
//!
//!     // First call invokes the operation, second is served from cache.
//!     let first = fetch.call((7,)).await.unwrap();
//!     let second = fetch.call((7,)).await.unwrap();
//!     assert_eq!(first, second);
//!     assert_eq!(fetch.size(), 1);
//!
//!     fetch.clear();
//!     assert_eq!(fetch.size(), 0);
//! }
//! ```
//!
//! ## Staleness and background refresh
//!
//! Entries go stale once a background sweep observes them older than the
//! configured `ttl`. A stale hit still returns immediately with the cached
//! value; the operation is re-invoked behind the caller's back and the
//! entry replaced on success. A failed refresh never reaches any caller;
//! it only fires the `entry.error` event and the old value keeps being
//! served. Entries that stay stale past `max_age` are removed entirely.
//!
//! With `refresh_interval` set to zero no sweep task runs at all, and
//! entries live until explicitly cleared.
//!
//! ## Lifecycle events
//!
//! ```rust
//! use refresco::{wrap, CacheConfig, EventKind};
//!
//! #[tokio::main]
//! async fn main() {
//!     let fetch = wrap(
//!         |(id,): (u32,)| async move { Ok::<u32, std::io::Error>(id * 2) },
//!         CacheConfig::new("doubles"),
//!     );
//!
//!     fetch.on(EventKind::EntryAdded, |event| {
//!         println!("cached {:?}", event.key());
//!     });
//!     fetch.once(EventKind::CacheCleared, |_event| {
//!         println!("cache emptied");
//!     });
//!
//!     fetch.call((3,)).await.unwrap();
//!     fetch.clear();
//! }
//! ```
//!
//! ## Error handling
//!
//! Failures take one of two disjoint channels. On a cache miss the wrapped
//! operation runs in the foreground and its error is returned to the caller
//! unmodified, with nothing stored. On a stale hit the operation runs in
//! the background and its error is reported only through `entry.error`.
//! The engine never retries on its own; the next lookup against a
//! still-stale entry starts the next attempt.

pub use refresco_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{wrap, CacheConfig, CacheEvent, CacheKey, EventKind, Memoized};
}
