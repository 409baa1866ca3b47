//! HiAnime operations backed by the durable response cache

use serde_json::Value;

use super::payload_err;
use crate::MediaClient;
use crate::cache::Params;
use crate::error::Error;
use crate::model::NormalizedMedia;
use crate::response::Response;
use crate::sources::hianime;
use crate::sources::hianime::EpisodeSummary;

/// The HiAnime home page, one normalized row per curated list.
#[derive(Debug, Clone, Default)]
pub struct HiAnimeHome {
    pub spotlight: Vec<NormalizedMedia>,
    pub trending: Vec<NormalizedMedia>,
    pub latest_episodes: Vec<NormalizedMedia>,
    pub upcoming: Vec<NormalizedMedia>,
    pub top_today: Vec<NormalizedMedia>,
    pub top_week: Vec<NormalizedMedia>,
    pub top_month: Vec<NormalizedMedia>,
    pub top_airing: Vec<NormalizedMedia>,
    pub most_popular: Vec<NormalizedMedia>,
    pub most_favorite: Vec<NormalizedMedia>,
    pub latest_completed: Vec<NormalizedMedia>,
}

impl From<hianime::HomeResponse> for HiAnimeHome {
    fn from(raw: hianime::HomeResponse) -> Self {
        fn normalize<R: Into<NormalizedMedia>>(items: Vec<R>) -> Vec<NormalizedMedia> {
            items.into_iter().map(Into::into).collect()
        }

        Self {
            spotlight: normalize(raw.spotlight_animes),
            trending: normalize(raw.trending_animes),
            latest_episodes: normalize(raw.latest_episode_animes),
            upcoming: normalize(raw.top_upcoming_animes),
            top_today: normalize(raw.top10_animes.today),
            top_week: normalize(raw.top10_animes.week),
            top_month: normalize(raw.top10_animes.month),
            top_airing: normalize(raw.top_airing_animes),
            most_popular: normalize(raw.most_popular_animes),
            most_favorite: normalize(raw.most_favorite_animes),
            latest_completed: normalize(raw.latest_completed_animes),
        }
    }
}

impl MediaClient {
    /// Fetches the HiAnime home page rows.
    pub async fn hianime_home(&self) -> Result<Response<HiAnimeHome>, Error> {
        let params = Params::new();
        let url = format!("{}/home", self.inner.hianime_url);
        let response = self.hianime_get("home", &params, url).await?;
        response.try_map(|value| {
            let home: hianime::HomeResponse =
                serde_json::from_value(into_payload(value)).map_err(payload_err("HiAnime home"))?;
            Ok(HiAnimeHome::from(home))
        })
    }

    /// Lists one page of a HiAnime category (e.g. `most-popular`,
    /// `top-airing`, `completed`).
    pub async fn hianime_category(
        &self,
        category: &str,
        page: u32,
    ) -> Result<Response<Vec<NormalizedMedia>>, Error> {
        let params = Params::new().with("category", category).with("page", page);
        let url = format!(
            "{}/category/{}?page={}",
            self.inner.hianime_url,
            urlencoding::encode(category),
            page
        );
        let response = self.hianime_get("category", &params, url).await?;
        response.try_map(|value| {
            let category: hianime::CategoryResponse =
                serde_json::from_value(into_payload(value))
                    .map_err(payload_err("HiAnime category"))?;
            Ok(category
                .animes
                .into_iter()
                .map(NormalizedMedia::from)
                .collect())
        })
    }

    /// Fetches the full detail record for one HiAnime title.
    pub async fn hianime_info(&self, id: &str) -> Result<Response<NormalizedMedia>, Error> {
        let params = Params::new().with("id", id);
        let url = format!("{}/anime/{}", self.inner.hianime_url, id);
        let response = self.hianime_get("info", &params, url).await?;
        response.try_map(|value| {
            let info: hianime::InfoResponse =
                serde_json::from_value(into_payload(value)).map_err(payload_err("HiAnime info"))?;
            Ok(NormalizedMedia::from(info.anime))
        })
    }

    /// Lists the episodes of one HiAnime title.
    pub async fn hianime_episodes(
        &self,
        id: &str,
    ) -> Result<Response<Vec<EpisodeSummary>>, Error> {
        let params = Params::new().with("id", id);
        let url = format!("{}/anime/{}/episodes", self.inner.hianime_url, id);
        let response = self.hianime_get("episodes", &params, url).await?;
        response.try_map(|value| {
            let list: hianime::EpisodesResponse = serde_json::from_value(into_payload(value))
                .map_err(payload_err("HiAnime episodes"))?;
            Ok(list.episodes)
        })
    }

    /// Deletes every persisted HiAnime response, leaving unrelated entries
    /// in the shared store untouched. Returns the number removed.
    pub async fn clear_hianime_cache(&self) -> usize {
        self.inner.response_cache.invalidate_all().await
    }

    /// Cache-aside wrapper for HiAnime endpoints.
    ///
    /// Requires a configured API key before anything else: a missing key is
    /// a configuration error, not a cache miss. On a hit the persisted
    /// envelope is returned without any network call; on a miss the raw
    /// envelope is fetched, persisted, and returned.
    async fn hianime_get(
        &self,
        endpoint: &str,
        params: &Params,
        url: String,
    ) -> Result<Response<Value>, Error> {
        let key = self.require_api_key()?;

        if let Some((value, cached_at, expires_at)) =
            self.inner.response_cache.read::<Value>(endpoint, params).await
        {
            return Ok(Response::hit(value, cached_at, expires_at));
        }

        let value = self.fetch_json(&url, Some(key)).await?;
        let (cached_at, expires_at) = self.inner.response_cache.write(endpoint, params, &value).await;
        Ok(Response::miss(value, cached_at, expires_at))
    }
}

/// Unwraps the `{"success": ..., "data": ...}` envelope HiAnime responses
/// arrive in; payloads without the envelope pass through unchanged.
fn into_payload(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        if let Some(data) = map.remove("data") {
            return data;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[tokio::test]
    async fn test_operations_require_api_key() {
        let client = MediaClient::builder().build().unwrap();
        let err = client.hianime_home().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingApiKey { service: "hianime" })
        ));
    }

    #[test]
    fn test_envelope_unwraps_data() {
        let wrapped = serde_json::json!({"success": true, "data": {"animes": []}});
        assert_eq!(into_payload(wrapped), serde_json::json!({"animes": []}));

        let bare = serde_json::json!({"animes": []});
        assert_eq!(into_payload(bare.clone()), bare);
    }

    #[test]
    fn test_home_rows_normalize() {
        let raw: hianime::HomeResponse = serde_json::from_value(serde_json::json!({
            "spotlightAnimes": [{
                "id": "one-piece-100",
                "name": "One Piece",
                "poster": "https://cdn.example/op.jpg",
                "rank": 1,
                "episodes": {"sub": 1090, "dub": 1048},
            }],
            "trendingAnimes": [{
                "id": "jujutsu-kaisen-2",
                "name": "Jujutsu Kaisen",
                "poster": "https://cdn.example/jjk.jpg",
                "rank": 2,
            }],
        }))
        .unwrap();

        let home = HiAnimeHome::from(raw);
        assert_eq!(home.spotlight.len(), 1);
        assert_eq!(home.spotlight[0].canonical_url, "/hianime/one-piece-100");
        assert_eq!(home.spotlight[0].episodes.unwrap().total, 1090);
        assert_eq!(home.trending[0].rank, Some(2));
        assert!(home.most_popular.is_empty());
    }
}
