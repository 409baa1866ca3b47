//! Stream video operations

use super::payload_err;
use super::with_query;
use crate::MediaClient;
use crate::error::Error;
use crate::model::NormalizedMedia;
use crate::response::Response;
use crate::sources::stream::StreamVideo;

impl MediaClient {
    /// Searches stream videos.
    ///
    /// Results are served from the request cache when fresh; concurrent
    /// identical searches share one upstream call.
    pub async fn search_videos(
        &self,
        query: &str,
    ) -> Result<Response<Vec<NormalizedMedia>>, Error> {
        let params = self.base_params().with("q", query);
        let url = with_query(format!("{}/search", self.inner.stream_url), &params);
        let response = self.cached_get("stream/search", &params, url).await?;
        response.try_map(|value| {
            let items: Vec<StreamVideo> =
                serde_json::from_value(value).map_err(payload_err("stream search"))?;
            Ok(items.into_iter().map(NormalizedMedia::from).collect())
        })
    }

    /// Lists trending videos for the configured language and region.
    pub async fn trending_videos(&self) -> Result<Response<Vec<NormalizedMedia>>, Error> {
        let params = self.base_params();
        let url = with_query(format!("{}/trending", self.inner.stream_url), &params);
        let response = self.cached_get("stream/trending", &params, url).await?;
        response.try_map(|value| {
            let items: Vec<StreamVideo> =
                serde_json::from_value(value).map_err(payload_err("stream trending"))?;
            Ok(items.into_iter().map(NormalizedMedia::from).collect())
        })
    }
}
