//! Durable TTL cache for full API response envelopes

use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::key::Params;
use super::store::KeyValueStore;

/// Namespace prefix on every durable cache key, so unrelated entries in a
/// shared store survive [`ResponseCache::invalidate_all`].
const KEY_PREFIX: &str = "hianime_cache:";

/// Persisted entry envelope.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    data: serde_json::Value,
    timestamp: DateTime<Utc>,
    #[serde(rename = "expiresAt")]
    expires_at: DateTime<Utc>,
}

/// TTL cache that persists full response envelopes through an injected
/// [`KeyValueStore`].
///
/// Entries expire lazily: a read past the expiry deletes the entry and
/// reports a miss; there is no eager sweep. Every storage or serialization
/// failure is contained here, logged and degraded to a miss or a skipped
/// write: caching is an optimization and must never break the primary data
/// path.
///
/// Concurrent processes sharing one store are not coordinated; writers race
/// last-write-wins.
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates a cache over `store` whose entries live for `ttl`.
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Reads a cached response for the endpoint and parameters.
    ///
    /// Returns the payload with its cache timestamps, or `None` when the
    /// entry is missing, expired (in which case it is deleted), corrupt, or
    /// the store fails. Corrupt entries are left in place; the next
    /// successful fetch overwrites them.
    pub async fn read<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &Params,
    ) -> Option<(T, DateTime<Utc>, DateTime<Utc>)> {
        let key = storage_key(endpoint, params);

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "response cache read failed");
                return None;
            }
        };

        let entry: StoredEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "ignoring corrupt response cache entry");
                return None;
            }
        };

        if Utc::now() > entry.expires_at {
            if let Err(err) = self.store.delete(&key).await {
                tracing::warn!(key = %key, error = %err, "failed to delete expired cache entry");
            }
            return None;
        }

        match serde_json::from_value(entry.data) {
            Ok(data) => Some((data, entry.timestamp, entry.expires_at)),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "cached payload does not match expected shape");
                None
            }
        }
    }

    /// Persists a response for the endpoint and parameters.
    ///
    /// Returns the timestamps recorded for the entry. Serialization and
    /// store failures are logged and swallowed; the returned timestamps
    /// describe the attempted entry either way.
    pub async fn write<T: Serialize>(
        &self,
        endpoint: &str,
        params: &Params,
        value: &T,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        let key = storage_key(endpoint, params);
        let now = Utc::now();
        let expires_at =
            now + chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::zero());

        let data = match serde_json::to_value(value) {
            Ok(data) => data,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to serialize response for caching");
                return (now, expires_at);
            }
        };
        let entry = StoredEntry {
            data,
            timestamp: now,
            expires_at,
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to serialize cache entry");
                return (now, expires_at);
            }
        };

        if let Err(err) = self.store.set(&key, &raw).await {
            tracing::warn!(key = %key, error = %err, "response cache write failed");
        }

        (now, expires_at)
    }

    /// Deletes every entry under the cache namespace, leaving unrelated
    /// keys in the store untouched.
    ///
    /// Returns the number of entries removed. Backs the user-facing
    /// "clear cache" action.
    pub async fn invalidate_all(&self) -> usize {
        let keys = match self.store.keys().await {
            Ok(keys) => keys,
            Err(err) => {
                tracing::warn!(error = %err, "response cache scan failed");
                return 0;
            }
        };

        let mut removed = 0;
        for key in keys.into_iter().filter(|key| key.starts_with(KEY_PREFIX)) {
            match self.store.delete(&key).await {
                Ok(()) => removed += 1,
                Err(err) => tracing::warn!(key = %key, error = %err, "failed to delete cache entry"),
            }
        }

        tracing::debug!(removed, "invalidated response cache");
        removed
    }
}

/// Namespaced storage key for an endpoint and its parameters.
fn storage_key(endpoint: &str, params: &Params) -> String {
    format!("{}{}_{}", KEY_PREFIX, endpoint, params.canonical_json())
}
