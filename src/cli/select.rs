use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    analyzer::AnalysisClient,
    cli::{client, result, spinner},
    engine::{BreakdownLoader, LoadedAnalysis, PlaylistSubmitter, SelectionStore},
    info, success, warning,
};

const HELP: &str = "\
commands:
  show                      print the breakdown and the current selection
  genre <GENRE>             select or deselect a genre
  exclude <TRACK_ID>        exclude or include a track
  assign <TRACK_ID> [GENRE] route an unclassified track to GENRE (no GENRE clears)
  clear                     drop every selection
  create                    create playlists from the selection
  create-all                create one playlist per genre
  retry                     reload the track details
  open <ANALYSIS_ID>        switch to another analysis
  quit                      leave";

/// Interactive selection session over one analysis.
///
/// Reads one command per line from stdin. Failures are reported and the
/// session continues.
pub async fn select(analysis_id: String) {
    let client = client();
    let mut loaded = result::load(&client, &analysis_id).await;
    let mut store = SelectionStore::new(&analysis_id);
    report_load(&loaded);
    result::print_analysis(&loaded, store.state());
    info!("Type `help` for a list of commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("genrecli> ");
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warning!("Cannot read input: {}", e);
                break;
            }
        };

        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            "show" => result::print_analysis(&loaded, store.state()),
            "genre" => toggle_genre(&loaded, &mut store, rest),
            "exclude" => toggle_exclude(&loaded, &mut store, rest),
            "assign" => assign(&loaded, &mut store, rest),
            "clear" => {
                store.clear();
                info!("Selection cleared.");
            }
            "create" => create(&client, &loaded, &store).await,
            "create-all" => create_all(&client, &loaded).await,
            "retry" => retry(&client, &mut loaded, &store).await,
            "open" if !rest.is_empty() => {
                loaded = result::load(&client, rest).await;
                store.reset_for(rest);
                report_load(&loaded);
                result::print_analysis(&loaded, store.state());
            }
            _ => warning!("Unknown command `{}`. Type `help`.", line),
        }
    }
}

fn report_load(loaded: &LoadedAnalysis) {
    if loaded.is_empty() {
        warning!(
            "Nothing could be loaded for analysis {}. Use `retry` or `open` another one.",
            loaded.analysis_id()
        );
    }
}

fn toggle_genre(loaded: &LoadedAnalysis, store: &mut SelectionStore, genre: &str) {
    if genre.is_empty() {
        warning!("Usage: genre <GENRE>");
        return;
    }
    if !loaded.result.buckets.contains_key(genre) {
        warning!("Genre {} is not part of this analysis.", genre);
        return;
    }

    store.toggle_genre(genre);
    if store.state().is_selected(genre) {
        info!("Selected {}.", genre);
    } else {
        info!("Deselected {}.", genre);
    }
}

fn toggle_exclude(loaded: &LoadedAnalysis, store: &mut SelectionStore, track_id: &str) {
    if track_id.is_empty() {
        warning!("Usage: exclude <TRACK_ID>");
        return;
    }
    if loaded.track_selection_available() && loaded.result.genre_of(track_id).is_none() {
        warning!("Track {} is not part of this analysis.", track_id);
        return;
    }

    store.toggle_exclude(track_id);
    if store.state().is_excluded(track_id) {
        info!("Excluded {}.", track_id);
    } else {
        info!("Included {} again.", track_id);
    }
}

fn assign(loaded: &LoadedAnalysis, store: &mut SelectionStore, args: &str) {
    let (track_id, genre) = match args.split_once(char::is_whitespace) {
        Some((track_id, genre)) => (track_id, genre.trim()),
        None => (args, ""),
    };
    if track_id.is_empty() {
        warning!("Usage: assign <TRACK_ID> [GENRE]");
        return;
    }

    match store.assign(&loaded.result, track_id, genre) {
        Ok(_) if genre.is_empty() => info!("Assignment of {} cleared.", track_id),
        Ok(_) => info!("{} will be added to {}.", track_id, genre),
        Err(e) => warning!("{}", e.user_message()),
    }
}

async fn create(client: &AnalysisClient, loaded: &LoadedAnalysis, store: &SelectionStore) {
    let submitter = PlaylistSubmitter::new(client);
    let snapshot = store.snapshot();

    let pb = spinner("Creating playlists...");
    let outcome = submitter.submit_selected(&loaded.result, &snapshot).await;
    pb.finish_and_clear();

    match outcome {
        Ok(created) => success!("{}", created.summary()),
        Err(e) => warning!("Failed to create playlists: {}", e.user_message()),
    }
}

async fn create_all(client: &AnalysisClient, loaded: &LoadedAnalysis) {
    let submitter = PlaylistSubmitter::new(client);

    let pb = spinner("Creating playlists for every genre...");
    let outcome = submitter.submit_full_auto(loaded.analysis_id()).await;
    pb.finish_and_clear();

    match outcome {
        Ok(summary) => success!(
            "{} playlists created. {} tracks added in total.",
            summary.created_playlists,
            summary.total_tracks
        ),
        Err(e) => warning!("Failed to create playlists: {}", e.user_message()),
    }
}

async fn retry(client: &AnalysisClient, loaded: &mut LoadedAnalysis, store: &SelectionStore) {
    if loaded.load_error().is_some() {
        let analysis_id = loaded.analysis_id().to_string();
        *loaded = result::load(client, &analysis_id).await;
        report_load(loaded);
        result::print_analysis(loaded, store.state());
        return;
    }

    let loader = BreakdownLoader::new(client);
    match loader.reload_details(loaded).await {
        Ok(()) => success!("Track details loaded."),
        Err(e) => warning!("Track details still unavailable: {}", e.user_message()),
    }
}
