use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use genrecli::analyzer::AnalysisApi;
use genrecli::engine::{
    AnalysisKind, AnalysisRequest, BreakdownLoader, PlaylistSubmitter, RequestState,
    SelectionState,
};
use genrecli::error::AnalyzerError;
use genrecli::types::{
    AnalysisResult, AnalysisStarted, AnalysisSummary, CreatedPlaylists, FullAutoSummary,
    GenreShare, PlaylistRequest, Session, Track,
};
use tokio::time::{sleep, timeout};

type Tracks = BTreeMap<String, Vec<Track>>;
type Shares = BTreeMap<String, GenreShare>;

// In-memory stand-in for the analysis service.
struct FakeApi {
    latency: Duration,
    breakdown_delay: Duration,
    details_delay: Duration,
    started: Result<AnalysisStarted, AnalyzerError>,
    shares: Result<Shares, AnalyzerError>,
    tracks: Mutex<Result<Tracks, AnalyzerError>>,
    created: Result<CreatedPlaylists, AnalyzerError>,
    analyze_calls: AtomicUsize,
    liked_calls: AtomicUsize,
    details_calls: AtomicUsize,
    playlist_calls: AtomicUsize,
    full_auto_calls: AtomicUsize,
    last_playlist_id: Mutex<Option<String>>,
    last_request: Mutex<Option<PlaylistRequest>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            breakdown_delay: Duration::ZERO,
            details_delay: Duration::ZERO,
            started: Ok(AnalysisStarted {
                analysis_id: Some("an-1".to_string()),
            }),
            shares: Ok(sample_shares()),
            tracks: Mutex::new(Ok(sample_tracks())),
            created: Ok(CreatedPlaylists {
                created_playlists: 1,
                total_tracks: Some(2),
            }),
            analyze_calls: AtomicUsize::new(0),
            liked_calls: AtomicUsize::new(0),
            details_calls: AtomicUsize::new(0),
            playlist_calls: AtomicUsize::new(0),
            full_auto_calls: AtomicUsize::new(0),
            last_playlist_id: Mutex::new(None),
            last_request: Mutex::new(None),
        }
    }
}

impl AnalysisApi for FakeApi {
    async fn analyze_liked(&self) -> Result<AnalysisStarted, AnalyzerError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        self.liked_calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.latency).await;
        self.started.clone()
    }

    async fn analyze_playlist(&self, playlist_id: &str) -> Result<AnalysisStarted, AnalyzerError> {
        self.analyze_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_playlist_id.lock().unwrap() = Some(playlist_id.to_string());
        sleep(self.latency).await;
        self.started.clone()
    }

    async fn breakdown(&self, _analysis_id: &str) -> Result<Shares, AnalyzerError> {
        sleep(self.breakdown_delay).await;
        self.shares.clone()
    }

    async fn details(&self, _analysis_id: &str) -> Result<Tracks, AnalyzerError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.details_delay).await;
        self.tracks.lock().unwrap().clone()
    }

    async fn create_playlists(
        &self,
        request: &PlaylistRequest,
    ) -> Result<CreatedPlaylists, AnalyzerError> {
        self.playlist_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        sleep(self.latency).await;
        self.created.clone()
    }

    async fn create_all_playlists(
        &self,
        _analysis_id: &str,
    ) -> Result<FullAutoSummary, AnalyzerError> {
        self.full_auto_calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.latency).await;
        Ok(FullAutoSummary {
            created_playlists: 2,
            total_tracks: 3,
        })
    }

    async fn analyses(&self) -> Result<Vec<AnalysisSummary>, AnalyzerError> {
        Ok(Vec::new())
    }
}

fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        name: format!("Song {}", id),
        artist: "Artist".to_string(),
        preview_url: None,
    }
}

fn sample_shares() -> Shares {
    BTreeMap::from([
        (
            "rock".to_string(),
            GenreShare {
                percentage: 66.7,
                count: 2,
            },
        ),
        (
            "unknown".to_string(),
            GenreShare {
                percentage: 33.3,
                count: 1,
            },
        ),
    ])
}

fn sample_tracks() -> Tracks {
    BTreeMap::from([
        ("rock".to_string(), vec![track("a"), track("b")]),
        ("unknown".to_string(), vec![track("c")]),
    ])
}

fn logged_in() -> Session {
    Session::logged_in(None)
}

fn server_error(message: &str) -> AnalyzerError {
    AnalyzerError::Application(message.to_string())
}

#[tokio::test]
async fn test_rapid_submits_send_one_request() {
    let api = FakeApi {
        latency: Duration::from_millis(50),
        ..Default::default()
    };
    let request = AnalysisRequest::new(&api, logged_in());

    let (first, second) = tokio::join!(
        request.submit(AnalysisKind::Liked),
        request.submit(AnalysisKind::Liked)
    );

    assert_eq!(api.liked_calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, RequestState::Succeeded("an-1".to_string()));
    assert_eq!(second, RequestState::Submitting);
    assert_eq!(request.state().await, RequestState::Succeeded("an-1".to_string()));
}

#[tokio::test]
async fn test_state_is_submitting_while_in_flight() {
    let api = FakeApi {
        latency: Duration::from_millis(50),
        ..Default::default()
    };
    let request = AnalysisRequest::new(&api, logged_in());
    assert_eq!(request.state().await, RequestState::Idle);

    let (_, observed) = tokio::join!(request.submit(AnalysisKind::Liked), async {
        sleep(Duration::from_millis(10)).await;
        request.state().await
    });

    assert_eq!(observed, RequestState::Submitting);
}

#[tokio::test]
async fn test_dropped_submit_allows_resubmission() {
    let api = FakeApi {
        latency: Duration::from_millis(100),
        ..Default::default()
    };
    let request = AnalysisRequest::new(&api, logged_in());

    let outcome = timeout(Duration::from_millis(10), request.submit(AnalysisKind::Liked)).await;
    assert!(outcome.is_err());
    assert_eq!(
        request.state().await,
        RequestState::Failed("Analysis was cancelled.".to_string())
    );

    let state = request.submit(AnalysisKind::Liked).await;

    assert_eq!(state, RequestState::Succeeded("an-1".to_string()));
    assert_eq!(api.liked_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_missing_analysis_id_fails() {
    for started in [
        AnalysisStarted { analysis_id: None },
        AnalysisStarted {
            analysis_id: Some(String::new()),
        },
    ] {
        let api = FakeApi {
            started: Ok(started),
            ..Default::default()
        };
        let request = AnalysisRequest::new(&api, logged_in());

        let state = request.submit(AnalysisKind::Liked).await;

        assert!(matches!(state, RequestState::Failed(_)), "{:?}", state);
    }
}

#[tokio::test]
async fn test_server_message_is_surfaced_and_resubmission_allowed() {
    let api = FakeApi {
        started: Err(server_error("No liked songs found.")),
        ..Default::default()
    };
    let request = AnalysisRequest::new(&api, logged_in());

    let state = request.submit(AnalysisKind::Liked).await;
    assert_eq!(state, RequestState::Failed("No liked songs found.".to_string()));

    // no automatic retry happened
    assert_eq!(api.analyze_calls.load(Ordering::SeqCst), 1);

    let state = request.submit(AnalysisKind::Liked).await;
    assert!(matches!(state, RequestState::Failed(_)));
    assert_eq!(api.analyze_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_logged_out_session_sends_nothing() {
    let api = FakeApi::default();
    let request = AnalysisRequest::new(&api, Session::default());

    let state = request.submit(AnalysisKind::Liked).await;

    assert!(matches!(state, RequestState::Failed(_)));
    assert_eq!(api.analyze_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_playlist_submission_uses_trimmed_id() {
    let api = FakeApi::default();
    let request = AnalysisRequest::new(&api, logged_in());

    let state = request
        .submit(AnalysisKind::Playlist(" 37i9dQZF1DX0XUsuxWHRQd ".to_string()))
        .await;
    assert_eq!(state.analysis_id(), Some("an-1"));
    assert_eq!(
        api.last_playlist_id.lock().unwrap().as_deref(),
        Some("37i9dQZF1DX0XUsuxWHRQd")
    );

    let state = request.submit(AnalysisKind::Playlist("  ".to_string())).await;
    assert!(matches!(state, RequestState::Failed(_)));
    assert_eq!(api.analyze_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_loader_merges_both_fetches() {
    let api = FakeApi::default();
    let loader = BreakdownLoader::new(&api);

    let loaded = loader.load("an-1").await;

    assert!(loaded.chart_available());
    assert!(loaded.track_selection_available());
    assert_eq!(
        loaded.result,
        AnalysisResult::from_parts("an-1", sample_shares(), sample_tracks())
    );
    let rock = loaded.result.bucket("rock").unwrap();
    assert_eq!(rock.count, 2);
    assert_eq!(rock.tracks.len(), 2);
}

#[tokio::test]
async fn test_loader_result_does_not_depend_on_arrival_order() {
    let breakdown_first = FakeApi {
        details_delay: Duration::from_millis(30),
        ..Default::default()
    };
    let details_first = FakeApi {
        breakdown_delay: Duration::from_millis(30),
        ..Default::default()
    };

    let a = BreakdownLoader::new(&breakdown_first).load("an-1").await;
    let b = BreakdownLoader::new(&details_first).load("an-1").await;

    assert_eq!(a.result, b.result);
}

#[tokio::test]
async fn test_breakdown_failure_keeps_tracks() {
    let api = FakeApi {
        shares: Err(server_error("Analysis not found")),
        ..Default::default()
    };
    let loader = BreakdownLoader::new(&api);

    let loaded = loader.load("an-1").await;

    assert!(loaded.load_error().is_some());
    assert!(!loaded.chart_available());
    assert!(loaded.track_selection_available());
    assert_eq!(
        loaded.result,
        AnalysisResult::from_details("an-1", sample_tracks())
    );
    for bucket in loaded.result.buckets.values() {
        assert_eq!(bucket.count, 0);
        assert_eq!(bucket.percentage, 0.0);
    }
    assert_eq!(loaded.result.bucket("rock").unwrap().tracks.len(), 2);

    // manual assignment stays usable
    let state = SelectionState::new().set_manual_assignment("c", "rock");
    let submitter = PlaylistSubmitter::new(&api);
    let created = submitter.submit_selected(&loaded.result, &state).await.unwrap();
    assert_eq!(created.created_playlists, 1);
}

#[tokio::test]
async fn test_details_failure_is_partial_and_retryable() {
    let api = FakeApi {
        tracks: Mutex::new(Err(AnalyzerError::Network("connection reset".to_string()))),
        ..Default::default()
    };
    let loader = BreakdownLoader::new(&api);

    let mut loaded = loader.load("an-1").await;

    assert!(loaded.load_error().is_none());
    assert!(loaded.chart_available());
    assert!(!loaded.track_selection_available());
    assert_eq!(loaded.result.bucket("rock").unwrap().count, 2);
    assert!(loaded.result.bucket("rock").unwrap().tracks.is_empty());

    let state = SelectionState::new().toggle_genre("rock");
    let submitter = PlaylistSubmitter::new(&api);
    let err = submitter
        .submit_selected(&loaded.result, &state)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(api.playlist_calls.load(Ordering::SeqCst), 0);

    assert!(loader.reload_details(&mut loaded).await.is_err());
    assert!(!loaded.track_selection_available());

    *api.tracks.lock().unwrap() = Ok(sample_tracks());
    loader.reload_details(&mut loaded).await.unwrap();

    assert!(loaded.track_selection_available());
    assert_eq!(loaded.result.bucket("rock").unwrap().tracks.len(), 2);
    assert_eq!(api.details_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_both_fetches_failing_leaves_nothing() {
    let api = FakeApi {
        shares: Err(server_error("down")),
        tracks: Mutex::new(Err(server_error("down"))),
        ..Default::default()
    };

    let loaded = BreakdownLoader::new(&api).load("an-1").await;

    assert!(loaded.is_empty());
    assert!(loaded.result.buckets.is_empty());
}

#[tokio::test]
async fn test_submit_selected_sends_built_request() {
    let api = FakeApi::default();
    let loaded = BreakdownLoader::new(&api).load("an-1").await;
    let state = SelectionState::new()
        .toggle_genre("rock")
        .toggle_exclude("b")
        .set_manual_assignment("c", "rock");

    let created = PlaylistSubmitter::new(&api)
        .submit_selected(&loaded.result, &state)
        .await
        .unwrap();

    assert_eq!(created.created_playlists, 1);
    assert_eq!(created.total_tracks, Some(2));
    let sent = api.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(
        sent.selected_tracks["rock"],
        vec!["a".to_string(), "c".to_string()]
    );
    assert_eq!(sent.excluded_track_ids, vec!["b".to_string()]);
}

#[tokio::test]
async fn test_empty_selection_never_reaches_network() {
    let api = FakeApi::default();
    let loaded = BreakdownLoader::new(&api).load("an-1").await;

    let err = PlaylistSubmitter::new(&api)
        .submit_selected(&loaded.result, &SelectionState::new())
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(api.playlist_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_submission_failure_carries_server_detail() {
    let api = FakeApi {
        created: Err(AnalyzerError::Protocol {
            status: 403,
            message: "User confirmation required".to_string(),
        }),
        ..Default::default()
    };
    let loaded = BreakdownLoader::new(&api).load("an-1").await;
    let state = SelectionState::new().toggle_genre("rock");

    let err = PlaylistSubmitter::new(&api)
        .submit_selected(&loaded.result, &state)
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "User confirmation required");
    assert_eq!(api.playlist_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_concurrent_submissions_are_not_deduplicated() {
    let api = FakeApi {
        latency: Duration::from_millis(20),
        ..Default::default()
    };
    let loaded = BreakdownLoader::new(&api).load("an-1").await;
    let state = SelectionState::new().toggle_genre("rock");
    let submitter = PlaylistSubmitter::new(&api);

    let (first, second) = tokio::join!(
        submitter.submit_selected(&loaded.result, &state),
        submitter.submit_selected(&loaded.result, &state)
    );

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_eq!(api.playlist_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_full_auto_sends_only_the_analysis_id() {
    let api = FakeApi::default();
    let submitter = PlaylistSubmitter::new(&api);

    let summary = submitter.submit_full_auto("an-1").await.unwrap();

    assert_eq!(summary.created_playlists, 2);
    assert_eq!(summary.total_tracks, 3);
    assert_eq!(api.full_auto_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.playlist_calls.load(Ordering::SeqCst), 0);

    assert!(submitter.submit_full_auto(" ").await.is_err());
    assert_eq!(api.full_auto_calls.load(Ordering::SeqCst), 1);
}
