//! Consumet aggregator API shapes
//!
//! The basic episodic source: catalogue search items and the
//! recent-episodes feed. Consumet pages results as
//! `{ currentPage, hasNextPage, results }`.

use serde::Deserialize;

use crate::model::MediaSource;
use crate::model::NormalizedMedia;
use crate::model::SubOrDub;

/// App route prefix for anime detail pages.
const ANIME_URL_PREFIX: &str = "/anime/";

/// Paged envelope shared by the search and recent-episodes endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub has_next_page: bool,
    pub results: Vec<T>,
}

/// A basic episodic anime item from the catalogue.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeItem {
    pub id: String,
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub release_date: Option<String>,
    /// `"sub"` or `"dub"`.
    #[serde(default)]
    pub sub_or_dub: Option<String>,
}

/// A recently released episode.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentEpisode {
    pub id: String,
    pub title: String,
    pub image: String,
    #[serde(default)]
    pub episode_id: Option<String>,
    #[serde(default)]
    pub episode_number: Option<u32>,
}

impl From<AnimeItem> for NormalizedMedia {
    fn from(raw: AnimeItem) -> Self {
        let canonical_url = format!("{}{}", ANIME_URL_PREFIX, raw.id);
        let mut media = NormalizedMedia::new(
            MediaSource::Consumet,
            raw.id,
            raw.title,
            raw.image,
            canonical_url,
        );
        media.released = raw.release_date;
        media.sub_or_dub = raw.sub_or_dub.as_deref().and_then(|track| match track {
            "sub" => Some(SubOrDub::Sub),
            "dub" => Some(SubOrDub::Dub),
            _ => None,
        });
        media
    }
}

impl From<RecentEpisode> for NormalizedMedia {
    fn from(raw: RecentEpisode) -> Self {
        let canonical_url = format!("{}{}", ANIME_URL_PREFIX, raw.id);
        let mut media = NormalizedMedia::new(
            MediaSource::Consumet,
            raw.id,
            raw.title,
            raw.image,
            canonical_url,
        );
        media.episode_number = raw.episode_number;
        media
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_item_populates_baseline() {
        let raw: AnimeItem = serde_json::from_value(serde_json::json!({
            "id": "spy-x-family",
            "title": "Spy x Family",
            "image": "https://cdn.example/spy.jpg",
        }))
        .unwrap();

        let media = NormalizedMedia::from(raw);
        assert_eq!(media.source, MediaSource::Consumet);
        assert_eq!(media.id, "spy-x-family");
        assert_eq!(media.title, "Spy x Family");
        assert_eq!(media.image_url, "https://cdn.example/spy.jpg");
        assert_eq!(media.canonical_url, "/anime/spy-x-family");
        assert_eq!(media.sub_or_dub, None);
    }

    #[test]
    fn test_dub_marker_maps_to_track() {
        let raw: AnimeItem = serde_json::from_value(serde_json::json!({
            "id": "x",
            "title": "t",
            "image": "u",
            "subOrDub": "dub",
        }))
        .unwrap();

        assert_eq!(NormalizedMedia::from(raw).sub_or_dub, Some(SubOrDub::Dub));
    }

    #[test]
    fn test_recent_episode_keeps_number() {
        let page: Paged<RecentEpisode> = serde_json::from_value(serde_json::json!({
            "currentPage": 1,
            "hasNextPage": true,
            "results": [{
                "id": "one-piece",
                "title": "One Piece",
                "image": "https://cdn.example/op.jpg",
                "episodeId": "one-piece-episode-1090",
                "episodeNumber": 1090,
            }],
        }))
        .unwrap();

        let media = NormalizedMedia::from(page.results[0].clone());
        assert_eq!(media.episode_number, Some(1090));
        assert_eq!(media.canonical_url, "/anime/one-piece");
    }
}
