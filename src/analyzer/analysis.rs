use std::collections::BTreeMap;

use super::AnalysisClient;
use crate::{
    error::AnalyzerError,
    types::{
        AnalysisDetails, AnalysisStarted, AnalysisSummary, AnalyzePlaylistRequest, Envelope,
        GenreShare, Track,
    },
};

impl AnalysisClient {
    /// Starts an analysis of the user's liked songs.
    ///
    /// Uses `POST /analyze-liked` with no body. A response without an
    /// `analysis_id` is passed through as `None`.
    pub async fn start_liked_analysis(&self) -> Result<AnalysisStarted, AnalyzerError> {
        let envelope: Envelope<AnalysisStarted> = self
            .fetch(self.post("/analyze-liked"), "Analysis failed.")
            .await?;
        Ok(envelope.data)
    }

    /// Starts an analysis of a single playlist through `POST /analyze`.
    pub async fn start_playlist_analysis(
        &self,
        playlist_id: &str,
    ) -> Result<AnalysisStarted, AnalyzerError> {
        let body = AnalyzePlaylistRequest {
            playlist_id: playlist_id.to_string(),
        };
        let envelope: Envelope<AnalysisStarted> = self
            .fetch(self.post("/analyze").json(&body), "Analysis failed.")
            .await?;
        Ok(envelope.data)
    }

    /// Genre percentage breakdown from `GET /analysis/{id}/breakdown`.
    ///
    /// # Returns
    ///
    /// Genre name mapped to its share, e.g. `{"rock": {percentage: 66.7,
    /// count: 2}}`. The `"unknown"` bucket is listed like any other genre.
    ///
    /// # Errors
    ///
    /// An unknown analysis id comes back as `Protocol { status: 404, .. }`
    /// carrying the service's `detail` text.
    pub async fn get_breakdown(
        &self,
        analysis_id: &str,
    ) -> Result<BTreeMap<String, GenreShare>, AnalyzerError> {
        let path = format!("/analysis/{}/breakdown", analysis_id);
        let envelope: Envelope<BTreeMap<String, GenreShare>> = self
            .fetch(self.get(&path), "Could not load the genre breakdown.")
            .await?;
        Ok(envelope.data)
    }

    /// Per-genre track listings from `GET /analysis/{id}/details`.
    ///
    /// The service wraps the listings in `data.tracks`; only that map is
    /// returned. Tracks whose name or artist is `null` are kept with empty
    /// strings.
    pub async fn get_details(
        &self,
        analysis_id: &str,
    ) -> Result<BTreeMap<String, Vec<Track>>, AnalyzerError> {
        let path = format!("/analysis/{}/details", analysis_id);
        let envelope: Envelope<AnalysisDetails> = self
            .fetch(self.get(&path), "Could not load the track details.")
            .await?;
        Ok(envelope.data.tracks)
    }

    /// Past analyses of the current user from `GET /user/analyses`.
    pub async fn get_analyses(&self) -> Result<Vec<AnalysisSummary>, AnalyzerError> {
        let envelope: Envelope<Vec<AnalysisSummary>> = self
            .fetch(self.get("/user/analyses"), "Could not load the analysis history.")
            .await?;
        Ok(envelope.data)
    }
}
