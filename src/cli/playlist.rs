use crate::{
    cli::{client, result, spinner},
    engine::{PlaylistSubmitter, SelectionStore},
    error, success, warning,
};

/// Creates playlists for one analysis from command-line selections.
///
/// With `all` the service creates one playlist per bucket. Otherwise the
/// given genres, exclusions and manual assignments are applied to a fresh
/// selection and submitted.
pub async fn playlist(
    analysis_id: String,
    genres: Vec<String>,
    excludes: Vec<String>,
    assignments: Vec<(String, String)>,
    all: bool,
) {
    let client = client();
    let submitter = PlaylistSubmitter::new(&client);

    if all {
        let pb = spinner("Creating playlists for every genre...");
        let outcome = submitter.submit_full_auto(&analysis_id).await;
        pb.finish_and_clear();

        match outcome {
            Ok(summary) => success!(
                "{} playlists created. {} tracks added in total.",
                summary.created_playlists,
                summary.total_tracks
            ),
            Err(e) => error!("Failed to create playlists: {}", e.user_message()),
        }
        return;
    }

    let loaded = result::load(&client, &analysis_id).await;
    if loaded.is_empty() {
        let reason = loaded
            .load_error()
            .map(|e| e.user_message().to_string())
            .unwrap_or_default();
        error!("Could not load analysis {}: {}", analysis_id, reason);
    }

    let mut store = SelectionStore::new(&analysis_id);
    for genre in &genres {
        if !loaded.result.buckets.contains_key(genre) {
            warning!("Genre {} is not part of this analysis, skipping.", genre);
            continue;
        }
        if !store.state().is_selected(genre) {
            store.toggle_genre(genre);
        }
    }
    for track_id in &excludes {
        if !store.state().is_excluded(track_id) {
            store.toggle_exclude(track_id);
        }
    }
    for (track_id, genre) in &assignments {
        if let Err(e) = store.assign(&loaded.result, track_id, genre) {
            error!("Cannot assign {}: {}", track_id, e.user_message());
        }
    }

    let pb = spinner("Creating playlists...");
    let outcome = submitter
        .submit_selected(&loaded.result, &store.snapshot())
        .await;
    pb.finish_and_clear();

    match outcome {
        Ok(created) => success!("{}", created.summary()),
        Err(e) => error!("Failed to create playlists: {}", e.user_message()),
    }
}
