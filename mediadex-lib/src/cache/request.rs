//! In-memory TTL cache with request coalescing

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::BoxFuture;
use futures::future::Shared;

use super::key::Params;
use super::key::cache_key;
use crate::error::Error;
use crate::response::Response;

/// Result of a coalesced fetch: the value and when it was cached, or the
/// failure every waiting caller observes.
type FetchResult<T> = Result<(T, DateTime<Utc>), Arc<Error>>;

type SharedFetch<T> = Shared<BoxFuture<'static, FetchResult<T>>>;

/// A cache slot: either a fetch in flight or a resolved value.
enum Slot<T> {
    /// A fetch in flight. Every caller for the key awaits this same future.
    /// The id ties the eventual completion back to this exact slot.
    InFlight { id: u64, fetch: SharedFetch<T> },
    /// A resolved value and when it resolved.
    Ready {
        value: T,
        cached_at: DateTime<Utc>,
    },
}

/// Deduplicating in-memory TTL cache for upstream API reads.
///
/// Concurrent calls for the same endpoint and parameters share one
/// underlying fetch: the fetcher runs exactly once and every caller
/// observes the same resolved value or the same failure. Resolved values
/// are served without network I/O until the TTL elapses; failures are never
/// cached, so the next call after an error retries from scratch.
///
/// Construct one cache per client and pass it by reference; there is no
/// process-wide instance.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use mediadex_lib::cache::{Params, RequestCache};
///
/// let cache = RequestCache::new(Duration::from_secs(300));
/// let params = Params::new().with("q", "naruto");
///
/// let response = cache
///     .get("search", &params, || async { fetch_search("naruto").await })
///     .await?;
/// ```
pub struct RequestCache<T> {
    slots: Arc<DashMap<String, Slot<T>>>,
    ttl: Duration,
    next_id: AtomicU64,
}

impl<T> RequestCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache whose resolved entries stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            ttl,
            next_id: AtomicU64::new(0),
        }
    }

    /// Returns the cached value for the endpoint and parameters, joining an
    /// in-flight fetch or invoking `fetcher` on a miss.
    ///
    /// The pending operation is stored before the first await, so callers
    /// arriving while it runs join it instead of fetching again. On success
    /// the resolved value is cached with a fresh timestamp; on failure the
    /// slot is removed and the error is shared with every waiting caller.
    ///
    /// Expired entries are treated as misses here even if no sweep has run.
    pub async fn get<F, Fut>(
        &self,
        endpoint: &str,
        params: &Params,
        fetcher: F,
    ) -> Result<Response<T>, Arc<Error>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let key = cache_key(endpoint, params);

        let fetch = match self.slots.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                let joined = match occupied.get() {
                    Slot::InFlight { fetch, .. } => Some(fetch.clone()),
                    Slot::Ready { value, cached_at } => {
                        if self.is_fresh(*cached_at) {
                            return Ok(Response::hit(
                                value.clone(),
                                *cached_at,
                                self.expiry(*cached_at),
                            ));
                        }
                        None
                    }
                };
                match joined {
                    Some(fetch) => fetch,
                    None => {
                        let (slot, fetch) = self.in_flight(key, fetcher);
                        occupied.insert(slot);
                        fetch
                    }
                }
            }
            Entry::Vacant(vacant) => {
                let (slot, fetch) = self.in_flight(key, fetcher);
                vacant.insert(slot);
                fetch
            }
        };

        let (value, cached_at) = fetch.await?;
        Ok(Response::miss(value, cached_at, self.expiry(cached_at)))
    }

    /// Drops every slot unconditionally.
    ///
    /// Used when settings that change API semantics flip (mock/live mode,
    /// language, region). In-flight fetches keep running, but their results
    /// no longer enter the cache: completion is gated on the slot id still
    /// being present.
    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Removes resolved entries older than the TTL.
    ///
    /// Returns the number of entries removed. `get` re-checks freshness on
    /// every read, so this sweep reclaims memory rather than enforcing
    /// correctness. In-flight slots are never swept.
    pub fn evict_expired(&self) -> usize {
        let mut removed = 0;
        self.slots.retain(|_, slot| match slot {
            Slot::InFlight { .. } => true,
            Slot::Ready { cached_at, .. } => {
                if self.is_fresh(*cached_at) {
                    true
                } else {
                    removed += 1;
                    false
                }
            }
        });
        removed
    }

    /// Returns the number of slots, including expired and in-flight ones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the cache holds no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn in_flight<F, Fut>(&self, key: String, fetcher: F) -> (Slot<T>, SharedFetch<T>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let slots = Arc::clone(&self.slots);
        let fut = fetcher();

        let fetch = async move {
            match fut.await {
                Ok(value) => {
                    let cached_at = Utc::now();
                    settle(&slots, &key, id, Some((value.clone(), cached_at)));
                    Ok((value, cached_at))
                }
                Err(err) => {
                    settle(&slots, &key, id, None);
                    Err(Arc::new(err))
                }
            }
        }
        .boxed()
        .shared();

        // Drive the fetch to completion even if every caller loses interest
        // before it resolves.
        tokio::spawn(fetch.clone());

        (
            Slot::InFlight {
                id,
                fetch: fetch.clone(),
            },
            fetch,
        )
    }

    fn is_fresh(&self, cached_at: DateTime<Utc>) -> bool {
        Utc::now().signed_duration_since(cached_at) <= self.ttl_chrono()
    }

    fn expiry(&self, cached_at: DateTime<Utc>) -> DateTime<Utc> {
        cached_at + self.ttl_chrono()
    }

    fn ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::zero())
    }
}

/// Applies a fetch outcome to the slot that started it.
///
/// A `clear` or a concurrent replacement may have dropped the slot while
/// the fetch ran; only the matching in-flight slot is settled, so a stale
/// completion can never resurrect a cleared key.
fn settle<T>(
    slots: &DashMap<String, Slot<T>>,
    key: &str,
    id: u64,
    outcome: Option<(T, DateTime<Utc>)>,
) {
    if let Entry::Occupied(mut occupied) = slots.entry(key.to_string()) {
        let matches = matches!(occupied.get(), Slot::InFlight { id: slot_id, .. } if *slot_id == id);
        if !matches {
            return;
        }
        match outcome {
            Some((value, cached_at)) => {
                occupied.insert(Slot::Ready { value, cached_at });
            }
            None => {
                occupied.remove();
            }
        }
    }
}
