//! The normalized media record

use serde::Deserialize;
use serde::Serialize;

use super::EpisodeCounts;
use super::SubOrDub;

/// Identifies which upstream API a [`NormalizedMedia`] record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaSource {
    /// The YouTube-like stream video API.
    Stream,
    /// The Jikan anime metadata API.
    Jikan,
    /// The Consumet anime aggregator.
    Consumet,
    /// The HiAnime REST API.
    Hianime,
}

impl std::fmt::Display for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaSource::Stream => write!(f, "Stream"),
            MediaSource::Jikan => write!(f, "Jikan"),
            MediaSource::Consumet => write!(f, "Consumet"),
            MediaSource::Hianime => write!(f, "HiAnime"),
        }
    }
}

/// A media record normalized from any supported upstream shape.
///
/// The baseline (`id`, `title`, `image_url`, `canonical_url`) is populated
/// by every normalizer. Source-specific fields stay `None` (or empty, for
/// `genres`) when the originating payload does not carry them; they are
/// never filled with defaults. Records are produced once at ingestion and
/// treated as immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMedia {
    /// Originating API.
    pub source: MediaSource,
    /// Identifier, scoped to the originating API.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Poster or thumbnail URL.
    pub image_url: String,
    /// App-internal route for this record.
    pub canonical_url: String,

    /// Synopsis or description.
    pub description: Option<String>,
    /// Upstream media type label (TV, Movie, ONA, ...).
    pub media_type: Option<String>,
    /// Airing status label.
    pub status: Option<String>,
    /// Aggregate score (0-10).
    pub score: Option<f64>,
    /// Popularity rank.
    pub rank: Option<u32>,
    /// Release year.
    pub year: Option<i32>,
    /// Release or airing date text, as provided upstream.
    pub released: Option<String>,
    /// Episode or video runtime text.
    pub duration: Option<String>,
    /// Stream quality label (HD, ...).
    pub quality: Option<String>,
    /// Genre names; empty when the source provides none.
    pub genres: Vec<String>,
    /// Sub/dub episode counters, when the source reports them.
    pub episodes: Option<EpisodeCounts>,
    /// Preferred audio track, when derivable.
    pub sub_or_dub: Option<SubOrDub>,
    /// Latest or featured episode number, for episode-feed items.
    pub episode_number: Option<u32>,
    /// Japanese title, when distinct from the display title.
    pub japanese_title: Option<String>,
    /// Channel or uploader name, for stream videos.
    pub author: Option<String>,
    /// View count, for stream videos.
    pub views: Option<u64>,
}

impl NormalizedMedia {
    /// Creates a record with the baseline populated and every
    /// source-specific field absent.
    pub fn new(
        source: MediaSource,
        id: impl Into<String>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        canonical_url: impl Into<String>,
    ) -> Self {
        Self {
            source,
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            canonical_url: canonical_url.into(),
            description: None,
            media_type: None,
            status: None,
            score: None,
            rank: None,
            year: None,
            released: None,
            duration: None,
            quality: None,
            genres: Vec::new(),
            episodes: None,
            sub_or_dub: None,
            episode_number: None,
            japanese_title: None,
            author: None,
            views: None,
        }
    }

    /// Returns `true` when a dubbed version is known to exist.
    pub fn has_dub(&self) -> bool {
        self.episodes.is_some_and(|counts| counts.has_dub())
    }
}
