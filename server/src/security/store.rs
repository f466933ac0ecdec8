use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached.  The rate limiter treats
    /// this as fail-open: the request proceeds without being counted.
    #[error("counter store unavailable: {0}")]
    Unavailable(String),
}

/// Pluggable counter storage for the rate limiter.
///
/// `get` returns the live count for a key (or `None` once the entry's TTL
/// has passed); `put` unconditionally overwrites the count with a fresh
/// TTL.  The read-then-write sequence built on top of these two calls is
/// not atomic — two concurrent requests at a window boundary can both read
/// the same count and both pass.  That looseness is part of the contract;
/// an implementation offering an atomic increment-and-compare would slot
/// in here if exact enforcement were ever needed.
///
/// Implementations: [`MemoryStore`] (single-process fallback).  A shared
/// external key-value service implementing this trait makes limiting
/// approximately global across serving instances, with whatever
/// consistency that store provides.
pub trait CounterStore: Send + Sync {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<u64>, StoreError>>;

    fn put(&self, key: &str, count: u64, ttl: Duration) -> BoxFuture<'_, Result<(), StoreError>>;
}

#[derive(Debug, Clone)]
struct CounterEntry {
    count: u64,
    expires_at: Instant,
}

/// In-memory fallback store used when no external store is configured.
///
/// Counts live in a `HashMap` behind a tokio `RwLock`; expired entries are
/// evicted lazily on read.  Not shared across processes and lost on
/// restart — a documented fallback for single-instance and development
/// deployments, constructed explicitly in `main` and injected via
/// `AppState` (never a hidden global).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, CounterEntry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<u64>, StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            let now = Instant::now();

            {
                let entries = self.entries.read().await;
                match entries.get(&key) {
                    Some(entry) if entry.expires_at > now => return Ok(Some(entry.count)),
                    Some(_) => {} // expired — evict below
                    None => return Ok(None),
                }
            }

            // Entry expired under the read lock. Re-check under the write
            // lock: a fresh window may have been written in between, and
            // evicting it would silently reset its count.
            let mut entries = self.entries.write().await;
            match entries.get(&key) {
                Some(entry) if entry.expires_at > now => Ok(Some(entry.count)),
                Some(_) => {
                    entries.remove(&key);
                    Ok(None)
                }
                None => Ok(None),
            }
        })
    }

    fn put(&self, key: &str, count: u64, ttl: Duration) -> BoxFuture<'_, Result<(), StoreError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.entries.write().await.insert(
                key,
                CounterEntry {
                    count,
                    expires_at: Instant::now() + ttl,
                },
            );
            Ok(())
        })
    }
}
