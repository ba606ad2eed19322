//! In-memory response cache with a freshness window

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Shared, type-erased cached payload
pub type Payload = Arc<dyn Any + Send + Sync>;

/// Cache key: endpoint plus query parameters sorted by name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(endpoint: &str, params: &[(String, String)]) -> Self {
        let mut sorted: Vec<_> = params.iter().collect();
        sorted.sort();

        let query = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            Self(endpoint.to_string())
        } else {
            Self(format!("{}?{}", endpoint, query))
        }
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

/// A cached response and when it was fetched
#[derive(Clone)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub payload: Payload,
    pub fetched_at: Instant,
}

impl CacheEntry {
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.fetched_at)
    }

    /// Fresh while strictly younger than the window
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) < ttl
    }
}

/// Response cache shared by all fetches of one client
///
/// Owned by the client instance rather than held in a global, so two clients
/// never see each other's entries.
pub struct ResponseCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates an empty cache with the given freshness window
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the payload if it is still fresh
    ///
    /// Expired entries are left in place until the next `insert`.
    pub async fn get(&self, key: &CacheKey) -> Option<Payload> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        if entry.is_fresh(self.ttl, now) {
            tracing::debug!(key = %key, age_ms = entry.age(now).as_millis() as u64, "Using cached data");
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// Returns the payload downcast to `T` if fresh and of that type
    pub async fn get_as<T: Any + Send + Sync>(&self, key: &CacheKey) -> Option<Arc<T>> {
        self.get(key).await?.downcast::<T>().ok()
    }

    /// Stores a payload, stamped with the current time
    ///
    /// Expired entries for other keys are dropped on the way in.
    pub async fn insert(&self, key: CacheKey, payload: Payload) {
        let now = Instant::now();
        let entry = CacheEntry {
            key: key.clone(),
            payload,
            fetched_at: now,
        };

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| e.is_fresh(self.ttl, now));
        let evicted = before - entries.len();

        tracing::debug!(key = %key, evicted, "Cached data");
        entries.insert(key, entry);
    }

    /// Drops every entry
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        let dropped = entries.len();
        entries.clear();
        tracing::debug!(dropped, "Cleared response cache");
    }

    /// Number of entries, fresh or not
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Keys of the entries that are still fresh
    pub async fn fresh_keys(&self) -> Vec<CacheKey> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.is_fresh(self.ttl, now))
            .map(|e| e.key.clone())
            .collect()
    }
}
