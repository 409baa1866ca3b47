//! HiAnime REST API shapes
//!
//! The widest source: the home page alone carries spotlight, trending,
//! latest-episode, upcoming, top-10, top-airing, most-popular,
//! most-favorite, and latest-completed rows, each with its own item shape.
//! All of them share the sub/dub episode counters and normalize through the
//! same derivation.

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use crate::model::EpisodeCounts;
use crate::model::MediaSource;
use crate::model::NormalizedMedia;

/// App route prefix for HiAnime detail pages.
const HIANIME_URL_PREFIX: &str = "/hianime/";

/// Sub/dub counters as they appear on HiAnime list items.
///
/// Counter values arrive as numbers or as digit strings depending on the
/// list; both coerce to integers, anything else reads as absent.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EpisodeCounters {
    #[serde(default, deserialize_with = "de_count")]
    pub sub: Option<u32>,
    #[serde(default, deserialize_with = "de_count")]
    pub dub: Option<u32>,
}

fn de_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(count)) => Some(count),
        Some(Raw::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Home page envelope with every curated row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeResponse {
    #[serde(default)]
    pub spotlight_animes: Vec<SpotlightAnime>,
    #[serde(default)]
    pub trending_animes: Vec<TrendingAnime>,
    #[serde(default)]
    pub latest_episode_animes: Vec<ListAnime>,
    #[serde(default)]
    pub top_upcoming_animes: Vec<ListAnime>,
    #[serde(default)]
    pub top10_animes: Top10Animes,
    #[serde(default)]
    pub top_airing_animes: Vec<MiniAnime>,
    #[serde(default)]
    pub most_popular_animes: Vec<MiniAnime>,
    #[serde(default)]
    pub most_favorite_animes: Vec<MiniAnime>,
    #[serde(default)]
    pub latest_completed_animes: Vec<MiniAnime>,
}

/// The three top-10 windows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Top10Animes {
    #[serde(default)]
    pub today: Vec<Top10Anime>,
    #[serde(default)]
    pub week: Vec<Top10Anime>,
    #[serde(default)]
    pub month: Vec<Top10Anime>,
}

/// A featured spotlight item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotlightAnime {
    pub id: String,
    pub name: String,
    pub poster: String,
    #[serde(default)]
    pub jname: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub episodes: Option<EpisodeCounters>,
}

/// A trending-row item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingAnime {
    pub id: String,
    pub name: String,
    pub poster: String,
    #[serde(default)]
    pub jname: Option<String>,
    #[serde(default)]
    pub rank: Option<u32>,
}

/// A latest-episode, upcoming, or category-page item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAnime {
    pub id: String,
    pub name: String,
    pub poster: String,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub episodes: Option<EpisodeCounters>,
}

/// A top-10 item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Top10Anime {
    pub id: String,
    pub name: String,
    pub poster: String,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub episodes: Option<EpisodeCounters>,
}

/// A top-airing, most-popular, most-favorite, or latest-completed item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniAnime {
    pub id: String,
    pub name: String,
    pub poster: String,
    #[serde(default)]
    pub jname: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub episodes: Option<EpisodeCounters>,
}

/// Category page envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    #[serde(default)]
    pub animes: Vec<ListAnime>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub current_page: Option<u32>,
}

/// Detail endpoint envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct InfoResponse {
    pub anime: AnimeInfo,
}

/// Full detail record: core info plus extended metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeInfo {
    pub info: Info,
    #[serde(default)]
    pub more_info: Option<MoreInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Info {
    pub id: String,
    pub name: String,
    pub poster: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stats: Option<Stats>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default, rename = "type")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub episodes: Option<EpisodeCounters>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoreInfo {
    #[serde(default)]
    pub japanese: Option<String>,
    #[serde(default)]
    pub aired: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
}

/// Episode list envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodesResponse {
    #[serde(default)]
    pub total_episodes: Option<u32>,
    #[serde(default)]
    pub episodes: Vec<EpisodeSummary>,
}

/// A single episode in an episode list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeSummary {
    pub episode_id: String,
    pub number: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_filler: bool,
}

fn base(id: String, name: String, poster: String) -> NormalizedMedia {
    let canonical_url = format!("{}{}", HIANIME_URL_PREFIX, id);
    NormalizedMedia::new(MediaSource::Hianime, id, name, poster, canonical_url)
}

fn apply_counters(media: &mut NormalizedMedia, counters: Option<EpisodeCounters>) {
    if let Some(counters) = counters {
        let counts = EpisodeCounts::derive(counters.sub, counters.dub);
        media.sub_or_dub = Some(counts.sub_or_dub());
        media.episodes = Some(counts);
    }
}

impl From<SpotlightAnime> for NormalizedMedia {
    fn from(raw: SpotlightAnime) -> Self {
        let mut media = base(raw.id, raw.name, raw.poster);
        media.description = raw.description;
        media.rank = raw.rank;
        media.japanese_title = raw.jname;
        apply_counters(&mut media, raw.episodes);
        media
    }
}

impl From<TrendingAnime> for NormalizedMedia {
    fn from(raw: TrendingAnime) -> Self {
        let mut media = base(raw.id, raw.name, raw.poster);
        media.rank = raw.rank;
        media.japanese_title = raw.jname;
        media
    }
}

impl From<ListAnime> for NormalizedMedia {
    fn from(raw: ListAnime) -> Self {
        let mut media = base(raw.id, raw.name, raw.poster);
        media.media_type = raw.media_type;
        media.duration = raw.duration;
        apply_counters(&mut media, raw.episodes);
        media
    }
}

impl From<Top10Anime> for NormalizedMedia {
    fn from(raw: Top10Anime) -> Self {
        let mut media = base(raw.id, raw.name, raw.poster);
        media.rank = raw.rank;
        apply_counters(&mut media, raw.episodes);
        media
    }
}

impl From<MiniAnime> for NormalizedMedia {
    fn from(raw: MiniAnime) -> Self {
        let mut media = base(raw.id, raw.name, raw.poster);
        media.media_type = raw.media_type;
        media.japanese_title = raw.jname;
        apply_counters(&mut media, raw.episodes);
        media
    }
}

impl From<AnimeInfo> for NormalizedMedia {
    fn from(raw: AnimeInfo) -> Self {
        let mut media = base(raw.info.id, raw.info.name, raw.info.poster);
        media.description = raw.info.description;
        if let Some(stats) = raw.info.stats {
            media.quality = stats.quality;
            media.media_type = stats.media_type;
            media.duration = stats.duration;
            apply_counters(&mut media, stats.episodes);
        }
        if let Some(more) = raw.more_info {
            media.japanese_title = more.japanese;
            media.released = more.aired;
            media.status = more.status;
            media.genres = more.genres;
        }
        media
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SubOrDub;

    #[test]
    fn test_minimal_spotlight_populates_baseline() {
        let raw: SpotlightAnime = serde_json::from_value(serde_json::json!({
            "id": "one-piece-100",
            "name": "One Piece",
            "poster": "https://cdn.example/op.jpg",
        }))
        .unwrap();

        let media = NormalizedMedia::from(raw);
        assert_eq!(media.source, MediaSource::Hianime);
        assert_eq!(media.id, "one-piece-100");
        assert_eq!(media.title, "One Piece");
        assert_eq!(media.image_url, "https://cdn.example/op.jpg");
        assert_eq!(media.canonical_url, "/hianime/one-piece-100");
        // No counters on the wire: the field stays absent, not zeroed.
        assert_eq!(media.episodes, None);
        assert_eq!(media.sub_or_dub, None);
    }

    #[test]
    fn test_counters_derive_track_and_total() {
        let raw: ListAnime = serde_json::from_value(serde_json::json!({
            "id": "x",
            "name": "t",
            "poster": "u",
            "episodes": {"sub": 0, "dub": 5},
        }))
        .unwrap();

        let media = NormalizedMedia::from(raw);
        let counts = media.episodes.unwrap();
        assert_eq!(counts.total, 5);
        assert_eq!(media.sub_or_dub, Some(SubOrDub::Dub));
        assert!(media.has_dub());
    }

    #[test]
    fn test_textual_counters_are_coerced() {
        let raw: Top10Anime = serde_json::from_value(serde_json::json!({
            "id": "x",
            "name": "t",
            "poster": "u",
            "rank": 1,
            "episodes": {"sub": "12", "dub": "3"},
        }))
        .unwrap();

        let counts = NormalizedMedia::from(raw).episodes.unwrap();
        assert_eq!(counts.sub, 12);
        assert_eq!(counts.dub, 3);
        assert_eq!(counts.total, 12);
    }

    #[test]
    fn test_home_envelope_tolerates_missing_rows() {
        let home: HomeResponse = serde_json::from_value(serde_json::json!({
            "spotlightAnimes": [{
                "id": "a",
                "name": "A",
                "poster": "u",
                "rank": 1,
            }],
            "top10Animes": {"today": [{"id": "b", "name": "B", "poster": "u"}]},
        }))
        .unwrap();

        assert_eq!(home.spotlight_animes.len(), 1);
        assert_eq!(home.top10_animes.today.len(), 1);
        assert!(home.trending_animes.is_empty());
        assert!(home.latest_completed_animes.is_empty());
    }

    #[test]
    fn test_detail_merges_info_and_more_info() {
        let raw: AnimeInfo = serde_json::from_value(serde_json::json!({
            "info": {
                "id": "steins-gate-3",
                "name": "Steins;Gate",
                "poster": "https://cdn.example/sg.jpg",
                "description": "A microwave...",
                "stats": {
                    "quality": "HD",
                    "type": "TV",
                    "duration": "24m",
                    "episodes": {"sub": 24, "dub": 24},
                },
            },
            "moreInfo": {
                "japanese": "シュタインズ・ゲート",
                "aired": "Apr 6, 2011 to Sep 14, 2011",
                "status": "Finished Airing",
                "genres": ["Sci-Fi", "Thriller"],
            },
        }))
        .unwrap();

        let media = NormalizedMedia::from(raw);
        assert_eq!(media.quality.as_deref(), Some("HD"));
        assert_eq!(media.media_type.as_deref(), Some("TV"));
        assert_eq!(media.status.as_deref(), Some("Finished Airing"));
        assert_eq!(media.genres, vec!["Sci-Fi", "Thriller"]);
        assert_eq!(media.episodes.unwrap().total, 24);
        assert_eq!(media.sub_or_dub, Some(SubOrDub::Sub));
    }

    #[test]
    fn test_episode_list_parses() {
        let list: EpisodesResponse = serde_json::from_value(serde_json::json!({
            "totalEpisodes": 2,
            "episodes": [
                {"episodeId": "sg-3?ep=1", "number": 1, "title": "Turning Point"},
                {"episodeId": "sg-3?ep=2", "number": 2, "isFiller": true},
            ],
        }))
        .unwrap();

        assert_eq!(list.total_episodes, Some(2));
        assert_eq!(list.episodes.len(), 2);
        assert!(list.episodes[1].is_filler);
        assert_eq!(list.episodes[1].title, None);
    }
}
