//! Time-bounded response cache.
//!
//! Responses are keyed by [`CacheKey`] and expire by age. Entries are never
//! invalidated explicitly. The cache is safe to share across threads.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::debug;

use crate::error::ClientError;
use crate::request::{CacheKey, GeoRequest};
use crate::traits::GeoClient;

#[derive(Debug)]
struct Entry {
    value: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) < self.ttl
    }
}

#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &CacheKey, now: Instant) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` and drops every entry that has already expired.
    pub fn insert(&self, key: CacheKey, value: Value, ttl: Duration) {
        self.insert_at(key, value, ttl, Instant::now());
    }

    fn insert_at(&self, key: CacheKey, value: Value, ttl: Duration, now: Instant) {
        let mut entries = self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.retain(|_, entry| entry.is_fresh(now));
        entries.insert(
            key,
            Entry {
                value,
                stored_at: now,
                ttl,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Serves cacheable requests from a [`ResponseCache`] before hitting `inner`.
///
/// Only successful responses are stored; requests without a TTL bypass the
/// cache entirely.
#[derive(Debug, Clone)]
pub struct CachingClient<C> {
    inner: C,
    cache: Arc<ResponseCache>,
}

impl<C: GeoClient> CachingClient<C> {
    pub fn new(inner: C, cache: Arc<ResponseCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }
}

impl<C: GeoClient> GeoClient for CachingClient<C> {
    fn fetch(&self, request: &GeoRequest) -> Result<Value, ClientError> {
        let Some(ttl) = request.cache_ttl else {
            return self.inner.fetch(request);
        };

        let key = request.cache_key();
        if let Some(value) = self.cache.get(&key) {
            debug!(url = %request.url, "serving response from cache");
            return Ok(value);
        }

        let value = self.inner.fetch(request)?;
        self.cache.insert(key, value.clone(), ttl);
        Ok(value)
    }
}
