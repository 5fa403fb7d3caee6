//! Response cache with per-key in-flight de-duplication.
//!
//! Entries hold the final outcome of a resolution only. Concurrent
//! resolutions of the same key are serialized through a per-key async lock,
//! so an uncached key reaches the backends once; the second caller finds the
//! stored outcome after the first one finishes.
//!
//! Lock order: `in_flight` map, then the per-key lock, then `entries`.
//! `entries` is never held across an await point.

use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as TokioMutex, OwnedMutexGuard};

use super::Resolution;
use crate::domain::Request;

/// Default number of cached outcomes.
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Cache identity of a resolution.
///
/// Generate prompts embed the codebase context, so its revision is part of
/// the key for that action; other actions leave it `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub request: Request,
    pub context_revision: Option<u64>,
}

pub struct ResponseCache {
    entries: Mutex<LruCache<CacheKey, Resolution>>,
    in_flight: Mutex<HashMap<CacheKey, Arc<TokioMutex<()>>>>,
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Look up an outcome, marking it most recently used.
    pub fn get(&self, key: &CacheKey) -> Option<Resolution> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    pub fn put(&self, key: CacheKey, outcome: Resolution) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.put(key, outcome);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Wait until no other resolution of `key` is running, then claim it.
    pub async fn claim(&self, key: &CacheKey) -> InFlight<'_> {
        let lock = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
            in_flight
                .entry(key.clone())
                .or_insert_with(|| Arc::new(TokioMutex::new(())))
                .clone()
        };
        let guard = lock.lock_owned().await;
        InFlight {
            cache: self,
            key: key.clone(),
            guard: Some(guard),
        }
    }
}

/// Exclusive claim on one key; released on drop.
pub struct InFlight<'a> {
    cache: &'a ResponseCache,
    key: CacheKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        // Release first so only the map and live waiters still hold the lock.
        self.guard.take();
        let mut in_flight = self
            .cache
            .in_flight
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        // A count of one is the map alone. This also drops entries left by
        // waiters that were cancelled before they acquired the lock.
        in_flight.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Action, BackendChoice, Language};

    fn key(code: &str) -> CacheKey {
        CacheKey {
            request: Request::new(
                code,
                Action::Explain,
                Language::Python,
                BackendChoice::default(),
            ),
            context_revision: None,
        }
    }

    #[test]
    fn test_lru_eviction() {
        let cache = ResponseCache::new(2);
        cache.put(key("a"), Ok("A".to_string()));
        cache.put(key("b"), Ok("B".to_string()));

        // Touch "a" so "b" becomes least recently used.
        assert_eq!(cache.get(&key("a")), Some(Ok("A".to_string())));
        cache.put(key("c"), Ok("C".to_string()));

        assert!(cache.get(&key("b")).is_none());
        assert!(cache.get(&key("a")).is_some());
        assert!(cache.get(&key("c")).is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_context_revision_is_part_of_key() {
        let cache = ResponseCache::new(4);
        let mut first = key("x");
        first.context_revision = Some(1);
        let mut second = key("x");
        second.context_revision = Some(2);

        cache.put(first.clone(), Ok("old".to_string()));
        assert!(cache.get(&second).is_none());
        assert!(cache.get(&first).is_some());
    }

    #[tokio::test]
    async fn test_claim_releases_entry() {
        let cache = ResponseCache::new(4);
        {
            let _claim = cache.claim(&key("x")).await;
            assert_eq!(cache.in_flight.lock().unwrap().len(), 1);
        }
        assert!(cache.in_flight.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_claim_serializes_same_key() {
        let cache = Arc::new(ResponseCache::new(4));
        let first = cache.claim(&key("x")).await;

        let waiter = {
            let cache = cache.clone();
            tokio::spawn(async move {
                let _claim = cache.claim(&key("x")).await;
                cache.get(&key("x"))
            })
        };

        tokio::task::yield_now().await;
        cache.put(key("x"), Ok("done".to_string()));
        drop(first);

        assert_eq!(waiter.await.unwrap(), Some(Ok("done".to_string())));
        assert!(cache.in_flight.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_waiter_leaves_no_entry() {
        let cache = Arc::new(ResponseCache::new(4));
        let first = cache.claim(&key("x")).await;

        let waiter = {
            let cache = cache.clone();
            tokio::spawn(async move {
                let _claim = cache.claim(&key("x")).await;
            })
        };
        tokio::task::yield_now().await;

        // The waiter still holds the lock handle when the holder releases.
        drop(first);
        assert_eq!(cache.in_flight.lock().unwrap().len(), 1);

        waiter.abort();
        let _ = waiter.await;

        // Any later release sweeps the abandoned entry.
        drop(cache.claim(&key("y")).await);
        assert!(cache.in_flight.lock().unwrap().is_empty());
    }
}
