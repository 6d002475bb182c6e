use std::collections::BTreeMap;

use crate::{
    engine::selection::SelectionState,
    error::AnalyzerError,
    types::{AnalysisResult, PlaylistRequest},
};

/// Derives the `POST /playlists` body from a result and a selection snapshot.
///
/// 1. Each selected genre present in `result` is seeded with its bucket's
///    track ids, in bucket order, minus excluded tracks.
/// 2. Each non-empty manual assignment of a non-excluded track appends the
///    track to its target genre unless already there. The target genre does
///    not have to be selected.
/// 3. `excluded_track_ids` is copied from `state` as is.
/// 4. A request with no track ids and no exclusions is rejected.
///
/// Selecting genres requires loaded track details.
pub fn build(
    result: &AnalysisResult,
    state: &SelectionState,
) -> Result<PlaylistRequest, AnalyzerError> {
    let mut selected_tracks: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for genre in &state.selected_genres {
        let Some(bucket) = result.bucket(genre) else {
            continue;
        };
        if !result.has_track_details() {
            return Err(AnalyzerError::Validation(
                "Track details are not loaded yet; retry loading them first.".to_string(),
            ));
        }

        let ids: Vec<String> = bucket
            .track_ids()
            .filter(|id| !state.is_excluded(id))
            .map(str::to_string)
            .collect();
        let entry = selected_tracks.entry(genre.clone()).or_default();
        for id in ids {
            if !entry.contains(&id) {
                entry.push(id);
            }
        }
    }

    for (track_id, genre) in &state.manual_assignments {
        if genre.is_empty() || state.is_excluded(track_id) {
            continue;
        }
        let entry = selected_tracks.entry(genre.clone()).or_default();
        if !entry.contains(track_id) {
            entry.push(track_id.clone());
        }
    }

    let request = PlaylistRequest {
        analysis_id: result.analysis_id.clone(),
        confirmation: true,
        selected_tracks,
        excluded_track_ids: state.excluded_track_ids.clone(),
    };

    if request.track_count() == 0 && request.excluded_track_ids.is_empty() {
        return Err(AnalyzerError::Validation(
            "Nothing to submit: select a genre, assign a track or exclude a track first."
                .to_string(),
        ));
    }

    Ok(request)
}
