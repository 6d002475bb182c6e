use super::AnalysisClient;
use crate::{
    error::AnalyzerError,
    types::{CreatedPlaylists, Envelope, FullAutoRequest, FullAutoSummary, PlaylistRequest},
};

impl AnalysisClient {
    /// Creates playlists for the selected tracks via `POST /playlists`.
    pub async fn post_playlists(
        &self,
        request: &PlaylistRequest,
    ) -> Result<CreatedPlaylists, AnalyzerError> {
        let envelope: Envelope<CreatedPlaylists> = self
            .fetch(
                self.post("/playlists").json(request),
                "Could not create the playlists.",
            )
            .await?;
        Ok(envelope.data)
    }

    /// Creates one playlist per bucket via `POST /playlists/full-auto`.
    ///
    /// Unlike every other endpoint the counts are not wrapped in `data`.
    pub async fn post_full_auto(&self, analysis_id: &str) -> Result<FullAutoSummary, AnalyzerError> {
        let body = FullAutoRequest {
            analysis_id: analysis_id.to_string(),
        };
        self.fetch(
            self.post("/playlists/full-auto").json(&body),
            "Could not create the playlists.",
        )
        .await
    }
}
