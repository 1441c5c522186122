use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// One parsed input line: the song title and the artist/movie context used
/// to narrow the search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SongRequest {
    pub title: String,
    pub context: String,
}

impl SongRequest {
    pub fn new(title: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            context: context.into(),
        }
    }
}

impl fmt::Display for SongRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} - {}", self.title, self.context)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub request: SongRequest,
    pub track_id: String,
    pub track_name: String,
    pub artist_name: String,
}

pub type UnmatchedEntry = SongRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub matches: Vec<MatchResult>,
    pub unmatched: Vec<UnmatchedEntry>,
}

impl MatchReport {
    /// Track identifiers of all matches in input order, duplicates included.
    pub fn track_ids(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.track_id.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub added_count: usize,
    pub unmatched: Vec<UnmatchedEntry>,
}

/// A playlist created for a run; the target of the add-items calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistHandle {
    pub id: String,
    pub external_url: String,
}

#[derive(Tabled)]
pub struct MatchTableRow {
    pub song: String,
    pub track: String,
    pub artist: String,
    pub uri: String,
}

impl From<&MatchResult> for MatchTableRow {
    fn from(m: &MatchResult) -> Self {
        Self {
            song: m.request.title.clone(),
            track: m.track_name.clone(),
            artist: m.artist_name.clone(),
            uri: m.track_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<TracksPage>,
}

impl SearchResponse {
    /// Result tracks in ranking order. `null` entries, which the search
    /// endpoint returns for unavailable items, are skipped.
    pub fn into_tracks(self) -> Vec<Track> {
        self.tracks
            .map(|page| page.items.into_iter().flatten().collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracksPage {
    #[serde(default)]
    pub items: Vec<Option<Track>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

impl Track {
    pub fn first_artist(&self) -> &str {
        self.artists
            .first()
            .map(|a| a.name.as_str())
            .unwrap_or("unknown artist")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}
