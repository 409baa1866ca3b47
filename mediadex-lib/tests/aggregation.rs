//! End-to-end aggregation flow over injected fakes
//!
//! Exercises the full search pipeline (parameter bag, request cache,
//! normalization) with a counting fetcher standing in for the network, the
//! same way the client operations compose the pieces.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::Value;
use serde_json::json;

use mediadex_lib::cache::KeyValueStore;
use mediadex_lib::cache::MemoryStore;
use mediadex_lib::cache::Params;
use mediadex_lib::cache::RequestCache;
use mediadex_lib::cache::ResponseCache;
use mediadex_lib::error::Error;
use mediadex_lib::model::MediaSource;
use mediadex_lib::model::NormalizedMedia;
use mediadex_lib::sources::hianime;
use mediadex_lib::sources::jikan;

/// One search call as the aggregation layer performs it: cache, parse,
/// normalize.
async fn search_anime(
    cache: &RequestCache<Value>,
    calls: &Arc<AtomicUsize>,
    query: &str,
) -> Result<(Vec<NormalizedMedia>, bool), Error> {
    let params = Params::new().with("q", query);
    let calls = Arc::clone(calls);

    let response = cache
        .get("jikan/search", &params, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            // A payload whose single item carries no genre list and no
            // optional metadata at all.
            Ok(json!({
                "data": [{
                    "mal_id": 20,
                    "title": "Naruto",
                    "images": {"jpg": {"image_url": "https://cdn.example/naruto.jpg"}},
                }],
            }))
        })
        .await
        .map_err(Error::from_shared)?;

    let cached = response.is_cached();
    let list: jikan::ListResponse = serde_json::from_value(response.into_inner())
        .expect("fixture payload parses");
    Ok((
        list.data.into_iter().map(NormalizedMedia::from).collect(),
        cached,
    ))
}

#[tokio::test]
async fn test_search_normalizes_and_caches() {
    let cache = RequestCache::new(Duration::from_secs(300));
    let calls = Arc::new(AtomicUsize::new(0));

    let (results, cached) = search_anime(&cache, &calls, "naruto").await.unwrap();

    // The item missing its genre list still satisfies the baseline.
    assert_eq!(results.len(), 1);
    let media = &results[0];
    assert_eq!(media.source, MediaSource::Jikan);
    assert_eq!(media.id, "20");
    assert_eq!(media.title, "Naruto");
    assert_eq!(media.image_url, "https://cdn.example/naruto.jpg");
    assert_eq!(media.canonical_url, "/anime/20");
    assert!(media.genres.is_empty());
    assert_eq!(media.score, None);
    assert!(!cached);

    // An identical search within the TTL never reaches the fetcher.
    let (again, cached) = search_anime(&cache, &calls, "naruto").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(again, results);
    assert!(cached);

    // A different query is its own slot.
    search_anime(&cache, &calls, "bleach").await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_hianime_flow_persists_through_store() {
    let store = Arc::new(MemoryStore::new());
    let cache = ResponseCache::new(
        Arc::clone(&store) as Arc<dyn KeyValueStore>,
        Duration::from_secs(3600),
    );
    let params = Params::new().with("category", "most-popular").with("page", 1);

    // First pass: miss, fetch, persist, as the category operation does.
    assert!(cache.read::<Value>("category", &params).await.is_none());
    let envelope = json!({
        "animes": [{
            "id": "one-piece-100",
            "name": "One Piece",
            "poster": "https://cdn.example/op.jpg",
            "episodes": {"sub": "1090", "dub": 1048},
        }],
        "totalPages": 100,
        "hasNextPage": true,
    });
    cache.write("category", &params, &envelope).await;

    // Second pass: served from the store, then normalized.
    let (value, _, _) = cache.read::<Value>("category", &params).await.unwrap();
    let category: hianime::CategoryResponse = serde_json::from_value(value).unwrap();
    let media: Vec<NormalizedMedia> = category
        .animes
        .into_iter()
        .map(NormalizedMedia::from)
        .collect();

    assert_eq!(media.len(), 1);
    assert_eq!(media[0].source, MediaSource::Hianime);
    assert_eq!(media[0].canonical_url, "/hianime/one-piece-100");
    // The textual sub counter coerced, and sub wins the tie-break.
    assert_eq!(media[0].episodes.unwrap().total, 1090);

    // The persisted entry lives under the namespaced key layout.
    let keys = store.keys().await.unwrap();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("hianime_cache:category_"));
}
