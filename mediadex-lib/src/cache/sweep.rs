//! Background eviction of expired request-cache entries

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::RequestCache;

/// Periodic sweeper for a [`RequestCache`].
///
/// The task is owned by whoever spawns it: constructing a cache never
/// starts one, and the sweep stops on [`shutdown`](Sweeper::shutdown) or
/// when the handle is dropped. `get` re-checks expiry on every read, so the
/// sweep is memory hygiene on top of that, not a correctness requirement.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use std::time::Duration;
/// use mediadex_lib::cache::{RequestCache, Sweeper};
///
/// let cache: Arc<RequestCache<String>> = Arc::new(RequestCache::new(Duration::from_secs(300)));
/// let sweeper = Sweeper::spawn(Arc::clone(&cache), Duration::from_secs(600));
/// // ...
/// sweeper.shutdown();
/// ```
pub struct Sweeper {
    handle: JoinHandle<()>,
}

impl Sweeper {
    /// Spawns a sweep of `cache` every `interval`.
    ///
    /// `interval` must be nonzero. Must be called from within a tokio
    /// runtime.
    pub fn spawn<T>(cache: Arc<RequestCache<T>>, interval: Duration) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; skip it so a freshly
            // constructed cache is not swept at startup.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = cache.evict_expired();
                if removed > 0 {
                    tracing::debug!(removed, "swept expired request cache entries");
                }
            }
        });
        Self { handle }
    }

    /// Stops the sweeper. Idempotent.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Params;

    #[tokio::test]
    async fn test_sweeper_evicts_in_background() {
        let cache = Arc::new(RequestCache::new(Duration::from_millis(10)));
        let params = Params::new();

        cache
            .get("trending", &params, || async { Ok("payload".to_string()) })
            .await
            .unwrap();
        assert_eq!(cache.len(), 1);

        let sweeper = Sweeper::spawn(Arc::clone(&cache), Duration::from_millis(25));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.is_empty());
        sweeper.shutdown();
    }
}
