//! Stale-while-revalidate in action: every caller gets an instant answer
//! while the entry expires and refreshes behind their back.
//!
//! Run with: `cargo run --example background_refresh`

use refresco_core::{wrap, CacheConfig, EventKind};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
#[error("quote feed offline")]
struct FeedError;

#[tokio::main]
async fn main() {
    let version = Arc::new(AtomicU32::new(0));
    let counter = version.clone();
    let quotes = wrap(
        move |(symbol,): (&'static str,)| {
            let v = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<String, FeedError>(format!("{symbol} #{v}")) }
        },
        CacheConfig::new("quotes")
            .with_ttl(Duration::from_millis(300))
            .with_refresh_interval(Duration::from_millis(100)),
    );

    for kind in [
        EventKind::EntryExpired,
        EventKind::EntryAdded,
        EventKind::EntryError,
    ] {
        quotes.on(kind, move |event| {
            println!("  event: {kind} {:?}", event.key());
        });
    }

    for _ in 0..6 {
        // Stale calls return the previous quote immediately; the refreshed
        // version shows up a beat later.
        println!("quote: {}", quotes.call(("ACME",)).await.unwrap());
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
}
