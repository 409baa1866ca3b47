//! Jikan (MyAnimeList) API shapes
//!
//! The richly detailed anime source: scores, ranks, genres, and airing
//! metadata. Jikan wraps every payload in a `data` envelope.

use serde::Deserialize;

use crate::model::EpisodeCounts;
use crate::model::MediaSource;
use crate::model::NormalizedMedia;

/// App route prefix for anime detail pages.
const ANIME_URL_PREFIX: &str = "/anime/";

/// Envelope for listing endpoints: `{ "data": [...], "pagination": {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    pub data: Vec<Anime>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Envelope for single-item endpoints: `{ "data": {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemResponse {
    pub data: Anime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub last_visible_page: Option<u32>,
    #[serde(default)]
    pub has_next_page: bool,
}

/// A scored/ranked anime record.
#[derive(Debug, Clone, Deserialize)]
pub struct Anime {
    pub mal_id: u64,
    pub title: String,
    pub images: Images,
    #[serde(default)]
    pub title_japanese: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub synopsis: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub aired: Option<Aired>,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Images {
    pub jpg: ImageSet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageSet {
    pub image_url: String,
    #[serde(default)]
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

/// Airing dates; only the display string is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct Aired {
    #[serde(default)]
    pub string: Option<String>,
}

impl From<Anime> for NormalizedMedia {
    fn from(raw: Anime) -> Self {
        let id = raw.mal_id.to_string();
        let image_url = raw
            .images
            .jpg
            .large_image_url
            .unwrap_or(raw.images.jpg.image_url);
        let canonical_url = format!("{}{}", ANIME_URL_PREFIX, id);

        let mut media =
            NormalizedMedia::new(MediaSource::Jikan, id, raw.title, image_url, canonical_url);
        media.description = raw.synopsis;
        media.media_type = raw.media_type;
        media.status = raw.status;
        media.score = raw.score;
        media.rank = raw.rank;
        media.year = raw.year;
        media.released = raw.aired.and_then(|aired| aired.string);
        media.duration = raw.duration;
        media.genres = raw.genres.into_iter().map(|genre| genre.name).collect();
        media.episodes = raw.episodes.map(EpisodeCounts::total_only);
        media.japanese_title = raw.title_japanese;
        media
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_item_populates_baseline() {
        let raw: Anime = serde_json::from_value(serde_json::json!({
            "mal_id": 20,
            "title": "Naruto",
            "images": {"jpg": {"image_url": "https://cdn.example/20.jpg"}},
        }))
        .unwrap();

        let media = NormalizedMedia::from(raw);
        assert_eq!(media.source, MediaSource::Jikan);
        assert_eq!(media.id, "20");
        assert_eq!(media.title, "Naruto");
        assert_eq!(media.image_url, "https://cdn.example/20.jpg");
        assert_eq!(media.canonical_url, "/anime/20");
        assert!(media.genres.is_empty());
        assert_eq!(media.episodes, None);
    }

    #[test]
    fn test_detailed_item_carries_fields_through() {
        let raw: Anime = serde_json::from_value(serde_json::json!({
            "mal_id": 5114,
            "title": "Fullmetal Alchemist: Brotherhood",
            "title_japanese": "鋼の錬金術師",
            "type": "TV",
            "images": {"jpg": {
                "image_url": "https://cdn.example/small.jpg",
                "large_image_url": "https://cdn.example/large.jpg",
            }},
            "episodes": 64,
            "status": "Finished Airing",
            "score": 9.1,
            "rank": 1,
            "year": 2009,
            "synopsis": "Two brothers...",
            "aired": {"string": "Apr 5, 2009 to Jul 4, 2010"},
            "genres": [{"name": "Action"}, {"name": "Adventure"}],
        }))
        .unwrap();

        let media = NormalizedMedia::from(raw);
        assert_eq!(media.image_url, "https://cdn.example/large.jpg");
        assert_eq!(media.score, Some(9.1));
        assert_eq!(media.rank, Some(1));
        assert_eq!(media.year, Some(2009));
        assert_eq!(media.genres, vec!["Action", "Adventure"]);
        assert_eq!(media.episodes.unwrap().total, 64);
        assert_eq!(media.released.as_deref(), Some("Apr 5, 2009 to Jul 4, 2010"));
    }

    #[test]
    fn test_list_envelope_parses() {
        let list: ListResponse = serde_json::from_value(serde_json::json!({
            "data": [{
                "mal_id": 1,
                "title": "Cowboy Bebop",
                "images": {"jpg": {"image_url": "u"}},
            }],
            "pagination": {"last_visible_page": 40, "has_next_page": true},
        }))
        .unwrap();

        assert_eq!(list.data.len(), 1);
        assert!(list.pagination.unwrap().has_next_page);
    }
}
