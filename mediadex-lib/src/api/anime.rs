//! Anime metadata and listing operations (Jikan and Consumet)

use super::payload_err;
use super::with_query;
use crate::MediaClient;
use crate::cache::Params;
use crate::error::Error;
use crate::model::NormalizedMedia;
use crate::response::Response;
use crate::sources::consumet;
use crate::sources::jikan;

impl MediaClient {
    /// Searches anime by title against the metadata source.
    pub async fn search_anime(&self, query: &str) -> Result<Response<Vec<NormalizedMedia>>, Error> {
        let params = Params::new().with("q", query);
        let url = with_query(format!("{}/anime", self.inner.jikan_url), &params);
        let response = self.cached_get("jikan/search", &params, url).await?;
        response.try_map(|value| {
            let list: jikan::ListResponse =
                serde_json::from_value(value).map_err(payload_err("anime search"))?;
            Ok(list.data.into_iter().map(NormalizedMedia::from).collect())
        })
    }

    /// Lists top-ranked anime, one page at a time.
    pub async fn top_anime(&self, page: u32) -> Result<Response<Vec<NormalizedMedia>>, Error> {
        let params = Params::new().with("page", page);
        let url = with_query(format!("{}/top/anime", self.inner.jikan_url), &params);
        let response = self.cached_get("jikan/top", &params, url).await?;
        response.try_map(|value| {
            let list: jikan::ListResponse =
                serde_json::from_value(value).map_err(payload_err("top anime"))?;
            Ok(list.data.into_iter().map(NormalizedMedia::from).collect())
        })
    }

    /// Fetches the full metadata record for one anime.
    pub async fn anime_details(&self, mal_id: u64) -> Result<Response<NormalizedMedia>, Error> {
        let params = Params::new().with("id", mal_id);
        let url = format!("{}/anime/{}", self.inner.jikan_url, mal_id);
        let response = self.cached_get("jikan/details", &params, url).await?;
        response.try_map(|value| {
            let item: jikan::ItemResponse =
                serde_json::from_value(value).map_err(payload_err("anime details"))?;
            Ok(NormalizedMedia::from(item.data))
        })
    }

    /// Searches the episodic streaming catalogue.
    pub async fn search_episodic(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Response<Vec<NormalizedMedia>>, Error> {
        let params = Params::new().with("q", query).with("page", page);
        let url = format!(
            "{}/anime/gogoanime/{}?page={}",
            self.inner.consumet_url,
            urlencoding::encode(query),
            page
        );
        let response = self.cached_get("consumet/search", &params, url).await?;
        response.try_map(|value| {
            let paged: consumet::Paged<consumet::AnimeItem> =
                serde_json::from_value(value).map_err(payload_err("episodic search"))?;
            Ok(paged.results.into_iter().map(NormalizedMedia::from).collect())
        })
    }

    /// Lists recently released episodes from the streaming catalogue.
    pub async fn recent_episodes(&self, page: u32) -> Result<Response<Vec<NormalizedMedia>>, Error> {
        let params = Params::new().with("page", page);
        let url = with_query(
            format!("{}/anime/gogoanime/recent-episodes", self.inner.consumet_url),
            &params,
        );
        let response = self.cached_get("consumet/recent-episodes", &params, url).await?;
        response.try_map(|value| {
            let paged: consumet::Paged<consumet::RecentEpisode> =
                serde_json::from_value(value).map_err(payload_err("recent episodes"))?;
            Ok(paged.results.into_iter().map(NormalizedMedia::from).collect())
        })
    }
}
