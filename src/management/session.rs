use std::path::{Path, PathBuf};

use crate::{
    error::AnalyzerError,
    types::{Session, UserProfile},
};

/// Persists the login flag and cached profile between runs.
pub struct SessionManager {
    session: Session,
}

impl SessionManager {
    pub fn new(session: Session) -> Self {
        SessionManager { session }
    }

    pub async fn load() -> Result<Self, AnalyzerError> {
        Self::load_from(&Self::session_path()).await
    }

    /// Cached session, or a logged-out one when nothing usable is cached.
    pub async fn load_or_default() -> Self {
        Self::load()
            .await
            .unwrap_or_else(|_| Self::new(Session::default()))
    }

    pub async fn load_from(path: &Path) -> Result<Self, AnalyzerError> {
        let content = async_fs::read_to_string(path).await?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Self { session })
    }

    pub async fn persist(&self) -> Result<(), AnalyzerError> {
        self.persist_to(&Self::session_path()).await
    }

    pub async fn persist_to(&self, path: &Path) -> Result<(), AnalyzerError> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.session)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<(), AnalyzerError> {
        self.clear_at(&Self::session_path()).await
    }

    pub async fn clear_at(&mut self, path: &Path) -> Result<(), AnalyzerError> {
        self.session = Session::default();
        match async_fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set_profile(&mut self, profile: Option<UserProfile>) -> &mut Self {
        self.session.profile = profile;
        self
    }

    pub fn current_session(&self) -> &Session {
        &self.session
    }

    fn session_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("genrecli/cache/session.json");
        path
    }
}
