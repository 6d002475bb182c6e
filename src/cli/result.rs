use tabled::Table;

use crate::{
    analyzer::AnalysisApi,
    cli::{client, spinner},
    engine::{BreakdownLoader, LoadedAnalysis, SelectionState, visible_genres},
    error, info,
    types::UNKNOWN_GENRE,
    utils, warning,
};

/// Shows the genre breakdown and track listings of one analysis.
pub async fn result(analysis_id: String) {
    let client = client();
    show(&client, &analysis_id).await;
}

pub(crate) async fn show<A: AnalysisApi>(api: A, analysis_id: &str) {
    let loaded = load(api, analysis_id).await;
    if loaded.is_empty() {
        let reason = loaded
            .load_error()
            .map(|e| e.user_message().to_string())
            .unwrap_or_default();
        error!("Could not load analysis {}: {}", analysis_id, reason);
    }

    print_analysis(&loaded, &SelectionState::new());
    if loaded.chart_available() {
        info!("Pick genres with `genrecli select {}`.", analysis_id);
    }
}

pub(crate) async fn load<A: AnalysisApi>(api: A, analysis_id: &str) -> LoadedAnalysis {
    let loader = BreakdownLoader::new(api);
    let pb = spinner(format!("Loading analysis {}...", analysis_id));
    let loaded = loader.load(analysis_id).await;
    pb.finish_and_clear();
    loaded
}

/// Renders the breakdown table, the summary line and the tracks relevant to
/// the current selection.
pub(crate) fn print_analysis(loaded: &LoadedAnalysis, state: &SelectionState) {
    let result = &loaded.result;

    match loaded.load_error() {
        Some(e) => warning!("Genre breakdown unavailable: {}", e.user_message()),
        None if result.buckets.is_empty() => info!("No genre data found."),
        None => println!("{}", Table::new(utils::genre_rows(result, state))),
    }

    let stats = result.stats();
    if stats.unknown_count > 0 {
        info!(
            "{} tracks analysed, {} genres found. {} tracks could not be classified.",
            stats.total_tracks, stats.genre_count, stats.unknown_count
        );
    } else {
        info!(
            "{} tracks analysed, {} genres found.",
            stats.total_tracks, stats.genre_count
        );
    }

    if let Some(e) = &loaded.details_error {
        warning!(
            "Track details unavailable: {}. Track selection is disabled until they are reloaded.",
            e.user_message()
        );
        return;
    }

    for genre in visible_genres(result, state) {
        let Some(bucket) = result.bucket(genre) else {
            continue;
        };
        info!("{}: {} tracks", genre, bucket.count);
        if !bucket.tracks.is_empty() {
            println!("{}", Table::new(utils::track_rows(bucket, state)));
        }
    }

    if let Some(unknown) = result.bucket(UNKNOWN_GENRE) {
        if !unknown.tracks.is_empty() && !state.is_selected(UNKNOWN_GENRE) {
            info!("Unclassified tracks (assign them to any genre):");
            println!("{}", Table::new(utils::track_rows(unknown, state)));
        }
    }
}
