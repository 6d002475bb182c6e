use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// Reserved genre for tracks the classifier could not assign.
pub const UNKNOWN_GENRE: &str = "unknown";

/// Reads an explicit `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A track as listed by `GET /analysis/{id}/details`.
///
/// The service sends `null` for names and artists it could not resolve; both
/// are read as empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artist: String,
    #[serde(default)]
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenreBucket {
    pub genre: String,
    pub percentage: f64,
    pub count: u32,
    pub tracks: Vec<Track>,
}

impl GenreBucket {
    pub fn new(genre: &str) -> Self {
        Self {
            genre: genre.to_string(),
            ..Default::default()
        }
    }

    pub fn track_ids(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(|t| t.id.as_str())
    }

    pub fn contains(&self, track_id: &str) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }
}

/// Merged breakdown and detail data of one analysis.
///
/// Breakdown data owns `percentage`/`count`, detail data owns `tracks`. The
/// two halves are applied independently, so the merged value does not depend
/// on which fetch completed first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    pub analysis_id: String,
    pub buckets: BTreeMap<String, GenreBucket>,
    breakdown_loaded: bool,
    details_loaded: bool,
}

impl AnalysisResult {
    pub fn new(analysis_id: &str) -> Self {
        Self {
            analysis_id: analysis_id.to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn apply_breakdown(&mut self, shares: BTreeMap<String, GenreShare>) {
        for (genre, share) in shares {
            let bucket = self
                .buckets
                .entry(genre.clone())
                .or_insert_with(|| GenreBucket::new(&genre));
            bucket.percentage = share.percentage;
            bucket.count = share.count;
        }
        self.breakdown_loaded = true;
    }

    pub(crate) fn apply_details(&mut self, tracks: BTreeMap<String, Vec<Track>>) {
        for (genre, list) in tracks {
            let bucket = self
                .buckets
                .entry(genre.clone())
                .or_insert_with(|| GenreBucket::new(&genre));
            bucket.tracks = list;
        }
        self.details_loaded = true;
    }

    /// Builds a fully loaded result in one go.
    pub fn from_parts(
        analysis_id: &str,
        shares: BTreeMap<String, GenreShare>,
        tracks: BTreeMap<String, Vec<Track>>,
    ) -> Self {
        let mut result = Self::new(analysis_id);
        result.apply_breakdown(shares);
        result.apply_details(tracks);
        result
    }

    /// A result whose details fetch has not completed.
    pub fn from_breakdown(analysis_id: &str, shares: BTreeMap<String, GenreShare>) -> Self {
        let mut result = Self::new(analysis_id);
        result.apply_breakdown(shares);
        result
    }

    /// A result whose breakdown fetch has not completed.
    pub fn from_details(analysis_id: &str, tracks: BTreeMap<String, Vec<Track>>) -> Self {
        let mut result = Self::new(analysis_id);
        result.apply_details(tracks);
        result
    }

    pub fn has_breakdown(&self) -> bool {
        self.breakdown_loaded
    }

    pub fn has_track_details(&self) -> bool {
        self.details_loaded
    }

    pub fn bucket(&self, genre: &str) -> Option<&GenreBucket> {
        self.buckets.get(genre)
    }

    /// Genre of the bucket that originally holds `track_id`.
    pub fn genre_of(&self, track_id: &str) -> Option<&str> {
        self.buckets
            .values()
            .find(|b| b.contains(track_id))
            .map(|b| b.genre.as_str())
    }

    pub fn is_unknown_track(&self, track_id: &str) -> bool {
        self.bucket(UNKNOWN_GENRE)
            .map(|b| b.contains(track_id))
            .unwrap_or(false)
    }

    pub fn stats(&self) -> AnalysisStats {
        let total_tracks = if self.details_loaded {
            self.buckets.values().map(|b| b.tracks.len() as u32).sum()
        } else {
            self.buckets.values().map(|b| b.count).sum()
        };
        let unknown_count = self
            .bucket(UNKNOWN_GENRE)
            .map(|b| {
                if self.details_loaded {
                    b.tracks.len() as u32
                } else {
                    b.count
                }
            })
            .unwrap_or(0);

        AnalysisStats {
            total_tracks,
            genre_count: self.buckets.len(),
            unknown_count,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStats {
    pub total_tracks: u32,
    pub genre_count: usize,
    pub unknown_count: u32,
}

/// Body of `POST /playlists`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistRequest {
    pub analysis_id: String,
    pub confirmation: bool,
    pub selected_tracks: BTreeMap<String, Vec<String>>,
    pub excluded_track_ids: Vec<String>,
}

impl PlaylistRequest {
    pub fn track_count(&self) -> usize {
        self.selected_tracks.values().map(|ids| ids.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl UserProfile {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Login context handed to the engine at construction time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub is_logged_in: bool,
    pub profile: Option<UserProfile>,
}

impl Session {
    pub fn logged_in(profile: Option<UserProfile>) -> Self {
        Self {
            is_logged_in: true,
            profile,
        }
    }
}

// Wire types. Every response is wrapped in `{status, data}` except full-auto.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    pub data: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisStarted {
    #[serde(default)]
    pub analysis_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenreShare {
    pub percentage: f64,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDetails {
    #[serde(default)]
    pub tracks: BTreeMap<String, Vec<Track>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedPlaylists {
    pub created_playlists: u32,
    #[serde(default)]
    pub total_tracks: Option<u32>,
}

impl CreatedPlaylists {
    /// One-line outcome for the terminal.
    pub fn summary(&self) -> String {
        match self.total_tracks {
            Some(total) => format!(
                "{} playlists created. {} tracks added in total.",
                self.created_playlists, total
            ),
            None => format!("{} playlists created.", self.created_playlists),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FullAutoSummary {
    pub created_playlists: u32,
    pub total_tracks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullAutoRequest {
    pub analysis_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzePlaylistRequest {
    pub playlist_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub analysis_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub track_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub spotify_connected: bool,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Tabled)]
pub struct GenreTableRow {
    pub genre: String,
    pub share: String,
    pub tracks: u32,
    pub selected: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub state: String,
}

#[derive(Tabled)]
pub struct AnalysisTableRow {
    pub created: String,
    pub analysis_id: String,
    pub tracks: u32,
    pub genres: u32,
}
