use crate::{
    cli::{client, result, spinner},
    config,
    engine::{AnalysisKind, AnalysisRequest, RequestState},
    error,
    management::SessionManager,
    success,
};

/// Submits a new analysis and shows its result once it succeeds.
pub async fn analyze(kind: AnalysisKind) {
    let manager = SessionManager::load_or_default().await;
    let client = client();
    let request = AnalysisRequest::new(&client, manager.current_session().clone())
        .with_handoff_delay(config::handoff_delay());

    let pb = spinner(format!("Analysing {}...", kind));
    let state = request.submit(kind).await;
    pb.finish_and_clear();

    match state {
        RequestState::Succeeded(analysis_id) => {
            success!("Analysis {} completed.", analysis_id);
            result::show(&client, &analysis_id).await;
        }
        RequestState::Failed(message) => error!("Analysis failed: {}", message),
        RequestState::Idle | RequestState::Submitting => {}
    }
}
