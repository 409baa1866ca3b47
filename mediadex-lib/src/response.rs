//! Response wrapper with cache status

use chrono::DateTime;
use chrono::Utc;

/// A payload returned by the client together with how it was obtained.
///
/// Every fetch operation returns this wrapper so callers can tell whether
/// the data came out of a cache or went over the network.
///
/// # Example
///
/// ```ignore
/// let response = client.search_anime("frieren").await?;
///
/// if response.is_cached() {
///     println!("served from cache, expires {:?}", response.expires_at());
/// }
///
/// for media in response.into_inner() {
///     println!("{}", media.title);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    data: T,
    /// How this payload relates to the cache.
    pub cache: CacheStatus,
}

impl<T> Response<T> {
    /// Wraps a payload that never touched a cache.
    pub fn uncached(data: T) -> Self {
        Self {
            data,
            cache: CacheStatus::None,
        }
    }

    /// Wraps a freshly fetched payload that is now cached.
    pub fn miss(data: T, cached_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            data,
            cache: CacheStatus::Miss {
                cached_at,
                expires_at,
            },
        }
    }

    /// Wraps a payload served from the cache.
    pub fn hit(data: T, cached_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            data,
            cache: CacheStatus::Hit {
                cached_at,
                expires_at,
            },
        }
    }

    /// Returns `true` if this payload was served from a cache.
    pub fn is_cached(&self) -> bool {
        matches!(self.cache, CacheStatus::Hit { .. })
    }

    /// Returns when the payload was cached, if a cache was involved.
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        match &self.cache {
            CacheStatus::None => None,
            CacheStatus::Miss { cached_at, .. } | CacheStatus::Hit { cached_at, .. } => {
                Some(*cached_at)
            }
        }
    }

    /// Returns when the cached payload expires, if a cache was involved.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match &self.cache {
            CacheStatus::None => None,
            CacheStatus::Miss { expires_at, .. } | CacheStatus::Hit { expires_at, .. } => {
                Some(*expires_at)
            }
        }
    }

    /// Returns a reference to the payload.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the response and returns the payload.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Maps the payload, keeping the cache status.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Response<U> {
        Response {
            data: f(self.data),
            cache: self.cache,
        }
    }

    /// Maps the payload through a fallible conversion, keeping the cache
    /// status on success.
    pub fn try_map<U, E, F: FnOnce(T) -> Result<U, E>>(self, f: F) -> Result<Response<U>, E> {
        Ok(Response {
            data: f(self.data)?,
            cache: self.cache,
        })
    }
}

/// Cache involvement for a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// No cache was involved.
    None,
    /// Cache miss: the payload was freshly fetched and is now cached.
    Miss {
        /// When the payload was cached.
        cached_at: DateTime<Utc>,
        /// When the cached payload expires.
        expires_at: DateTime<Utc>,
    },
    /// Cache hit: the payload was served without a network call.
    Hit {
        /// When the payload was originally cached.
        cached_at: DateTime<Utc>,
        /// When the cached payload expires.
        expires_at: DateTime<Utc>,
    },
}

impl CacheStatus {
    /// Returns `true` if this is a cache hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Returns `true` if this is a cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss { .. })
    }
}
