use super::AnalysisClient;
use crate::{
    error::AnalyzerError,
    types::{Envelope, HealthStatus, UserProfile},
};

impl AnalysisClient {
    /// URL that starts the service's Spotify login in a browser.
    pub fn login_url(&self) -> String {
        self.url("/login")
    }

    /// Service health, including whether a Spotify account is connected.
    pub async fn health(&self) -> Result<HealthStatus, AnalyzerError> {
        let envelope: Envelope<HealthStatus> = self
            .fetch(self.get("/health"), "Health check failed.")
            .await?;
        Ok(envelope.data)
    }

    /// Profile of the connected Spotify account.
    pub async fn profile(&self) -> Result<UserProfile, AnalyzerError> {
        let envelope: Envelope<UserProfile> = self
            .fetch(self.get("/me"), "Could not load the user profile.")
            .await?;
        Ok(envelope.data)
    }

    pub async fn logout(&self) -> Result<(), AnalyzerError> {
        let _: serde_json::Value = self.fetch(self.post("/logout"), "Logout failed.").await?;
        Ok(())
    }
}
