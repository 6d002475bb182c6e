use std::cmp::Ordering;

use chrono::{DateTime, NaiveDateTime};

use crate::{
    engine::SelectionState,
    types::{
        AnalysisResult, AnalysisSummary, AnalysisTableRow, GenreBucket, GenreTableRow,
        TrackTableRow,
    },
};

/// Extracts a playlist id from a Spotify playlist URL or returns the input.
///
/// `https://open.spotify.com/playlist/37i9dQZF1DX0XUsuxWHRQd?si=abc` yields
/// `37i9dQZF1DX0XUsuxWHRQd`. Input without a `playlist/` segment is taken as
/// an id. Blank input yields `None`.
pub fn extract_playlist_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(pos) = input.find("playlist/") {
        let rest = &input[pos + "playlist/".len()..];
        let id = rest.split('?').next().unwrap_or_default();
        if !id.is_empty() {
            return Some(id.to_string());
        }
    }

    Some(input.to_string())
}

/// Parses `TRACK=GENRE` for `--assign`. An empty genre clears the assignment.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let Some((track, genre)) = s.split_once('=') else {
        return Err(format!("invalid assignment '{}', expected TRACK=GENRE", s));
    };
    let track = track.trim();
    if track.is_empty() {
        return Err(format!("invalid assignment '{}', track id is empty", s));
    }
    Ok((track.to_string(), genre.trim().to_string()))
}

pub fn format_percentage(percentage: f64) -> String {
    format!("{:.1}%", percentage)
}

/// Renders a service timestamp as `YYYY-MM-DD HH:MM`, or the raw text.
pub fn format_created_at(created_at: Option<&str>) -> String {
    let Some(raw) = created_at else {
        return "-".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    raw.to_string()
}

pub fn genre_rows(result: &AnalysisResult, state: &SelectionState) -> Vec<GenreTableRow> {
    let mut buckets: Vec<&GenreBucket> = result.buckets.values().collect();
    buckets.sort_by(|a, b| {
        match b
            .percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Equal => a.genre.cmp(&b.genre),
            other => other,
        }
    });

    buckets
        .into_iter()
        .map(|b| GenreTableRow {
            genre: b.genre.clone(),
            share: format_percentage(b.percentage),
            tracks: b.count,
            selected: if state.is_selected(&b.genre) { "yes" } else { "" }.to_string(),
        })
        .collect()
}

pub fn track_rows(bucket: &GenreBucket, state: &SelectionState) -> Vec<TrackTableRow> {
    bucket
        .tracks
        .iter()
        .map(|t| {
            let state = if state.is_excluded(&t.id) {
                "excluded".to_string()
            } else if let Some(genre) = state.assignment(&t.id) {
                format!("→ {}", genre)
            } else {
                String::new()
            };
            TrackTableRow {
                id: t.id.clone(),
                name: or_unknown(&t.name),
                artist: or_unknown(&t.artist),
                state,
            }
        })
        .collect()
}

fn or_unknown(value: &str) -> String {
    if value.trim().is_empty() {
        "Unknown".to_string()
    } else {
        value.to_string()
    }
}

/// History rows, newest first.
pub fn history_rows(mut analyses: Vec<AnalysisSummary>) -> Vec<AnalysisTableRow> {
    analyses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    analyses
        .into_iter()
        .map(|a| AnalysisTableRow {
            created: format_created_at(a.created_at.as_deref()),
            analysis_id: a.analysis_id,
            tracks: a.track_count,
            genres: a.genre_count,
        })
        .collect()
}
