//! Basic memoization: the second call with equal arguments is served from
//! the cache without touching the wrapped operation.
//!
//! Run with: `cargo run --example swr_basic`

use refresco_core::{wrap, CacheConfig};
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
#[error("user service unavailable")]
struct ServiceError;

#[tokio::main]
async fn main() {
    let fetch_user = wrap(
        |(id,): (u32,)| async move {
            // Stand-in for a slow remote call.
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok::<String, ServiceError>(format!("user-{id}"))
        },
        CacheConfig::new("users"),
    );

    let started = Instant::now();
    let user = fetch_user.call((7,)).await.unwrap();
    println!("first call:  {user} in {:?}", started.elapsed());

    let started = Instant::now();
    let user = fetch_user.call((7,)).await.unwrap();
    println!("second call: {user} in {:?}", started.elapsed());

    println!("cached entries: {}", fetch_user.size());
    fetch_user.clear();
    println!("after clear:    {}", fetch_user.size());
}
