//! Entity cache
//!
//! Holds fully materialized entities keyed by `table[_id_]` for a fixed TTL.
//! Backed by a `DashMap`, so one instance can be shared (`Arc`) by any number
//! of orchestrators and threads. Expiry is lazy: an expired entry reads as
//! absent and is dropped on access, or in bulk by [`EntityCache::purge_expired`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::CacheConfig;
use crate::model::Value;

/// Default time-to-live of a cached entity
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cache key combining a table name and a primary-key value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(table: &str, id: &Value) -> Self {
        Self(format!("{}[_{}_]", table, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone)]
struct CachedEntry {
    value: Arc<dyn Any + Send + Sync>,
    expires_at: Option<Instant>,
}

impl CachedEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Process-local TTL cache of entities
pub struct EntityCache {
    entries: DashMap<CacheKey, CachedEntry>,
    ttl: Duration,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_ttl(config.ttl())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached entity for `(table, id)`, absent when missing, expired or of
    /// another type
    pub fn get<T>(&self, table: &str, id: impl Into<Value>) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.get_by_key(&CacheKey::new(table, &id.into()))
    }

    /// Insert or overwrite; the entry expires `ttl` from now
    pub fn set<T>(&self, table: &str, id: impl Into<Value>, entity: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        self.set_by_key(CacheKey::new(table, &id.into()), entity);
    }

    /// Remove the entry for `(table, id)` if present
    pub fn delete(&self, table: &str, id: impl Into<Value>) {
        self.delete_by_key(&CacheKey::new(table, &id.into()));
    }

    pub fn get_by_key<T>(&self, key: &CacheKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();
        match self.entries.get(key) {
            None => return None,
            Some(entry) if !entry.is_expired(now) => {
                return entry.value.downcast_ref::<T>().cloned();
            }
            Some(_) => {}
        }
        // Shard guard is released here; drop the stale entry unless a
        // concurrent writer replaced it
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        tracing::debug!(cache_key = %key, "cache entry expired");
        None
    }

    pub fn set_by_key<T>(&self, key: CacheKey, entity: T)
    where
        T: Clone + Send + Sync + 'static,
    {
        // An overflowing deadline never expires
        let expires_at = Instant::now().checked_add(self.ttl);
        self.entries.insert(
            key,
            CachedEntry {
                value: Arc::new(entity),
                expires_at,
            },
        );
    }

    pub fn delete_by_key(&self, key: &CacheKey) {
        self.entries.remove(key);
    }

    /// Number of live entries
    pub fn count(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| !e.value().is_expired(now)).count()
    }

    /// Drop every expired entry and return how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(removed, "purged expired cache entries");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCache")
            .field("entries", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}
