//! YouTube-like stream video API shapes

use serde::Deserialize;

use crate::model::MediaSource;
use crate::model::NormalizedMedia;

/// App route prefix for stream videos.
const VIDEO_URL_PREFIX: &str = "/video/";

/// A video item as returned by the search and trending listings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamVideo {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
    /// Channel name.
    #[serde(default)]
    pub author: Option<String>,
    /// View counter; arrives as display text ("1,204,532").
    #[serde(default)]
    pub view_count: Option<String>,
    /// Relative publish date text ("3 days ago").
    #[serde(default)]
    pub published_text: Option<String>,
    /// Runtime text ("24:03").
    #[serde(default)]
    pub duration: Option<String>,
}

impl From<StreamVideo> for NormalizedMedia {
    fn from(raw: StreamVideo) -> Self {
        let canonical_url = format!("{}{}", VIDEO_URL_PREFIX, raw.video_id);
        let mut media = NormalizedMedia::new(
            MediaSource::Stream,
            raw.video_id,
            raw.title,
            raw.thumbnail_url,
            canonical_url,
        );
        media.author = raw.author;
        media.views = raw
            .view_count
            .and_then(|count| count.replace(',', "").trim().parse().ok());
        media.released = raw.published_text;
        media.duration = raw.duration;
        media
    }
}
