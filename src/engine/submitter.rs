use crate::{
    analyzer::AnalysisApi,
    debug,
    engine::{builder, selection::SelectionState},
    error::AnalyzerError,
    types::{AnalysisResult, CreatedPlaylists, FullAutoSummary},
};

/// Sends playlist-creation requests.
///
/// Each call issues exactly one request. Concurrent calls are not merged;
/// callers disable their trigger while a submission is in flight.
pub struct PlaylistSubmitter<A> {
    api: A,
}

impl<A: AnalysisApi> PlaylistSubmitter<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Builds a request from the snapshot and submits it.
    ///
    /// # Arguments
    ///
    /// * `result` - The loaded analysis the selection was made on
    /// * `state` - A snapshot of the selection, see [`SelectionStore::snapshot`](crate::engine::SelectionStore::snapshot)
    ///
    /// # Returns
    ///
    /// - `Ok(CreatedPlaylists)` - how many playlists the service created and,
    ///   when reported, how many tracks went into them
    /// - `Err(AnalyzerError::Validation)` - the request could not be built;
    ///   nothing was sent
    /// - `Err(_)` - any failure of `POST /playlists`
    pub async fn submit_selected(
        &self,
        result: &AnalysisResult,
        state: &SelectionState,
    ) -> Result<CreatedPlaylists, AnalyzerError> {
        let request = builder::build(result, state)?;
        debug!(
            "creating playlists for {} genres, {} tracks, {} excluded",
            request.selected_tracks.len(),
            request.track_count(),
            request.excluded_track_ids.len()
        );

        self.api.create_playlists(&request).await
    }

    /// Asks the service to create one playlist for every bucket.
    ///
    /// Only the analysis id is sent; the selection plays no part. A blank id is
    /// rejected with `AnalyzerError::Validation` before anything is sent.
    pub async fn submit_full_auto(
        &self,
        analysis_id: &str,
    ) -> Result<FullAutoSummary, AnalyzerError> {
        if analysis_id.trim().is_empty() {
            return Err(AnalyzerError::Validation(
                "An analysis id is required.".to_string(),
            ));
        }
        self.api.create_all_playlists(analysis_id).await
    }
}
