use reqwest::StatusCode;
use thiserror::Error;

/// Every failure the analyzer client and the engine can report.
///
/// None of these is fatal: each is surfaced at the boundary where it occurs
/// and the triggering action may be retried.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyzerError {
    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx status or a body that is not the expected JSON.
    #[error("Protocol error ({status}): {message}")]
    Protocol { status: u16, message: String },

    /// Well-formed response whose `status` is not `"success"`.
    #[error("{0}")]
    Application(String),

    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),

    /// No usable login context.
    #[error("{0}")]
    Session(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

impl AnalyzerError {
    pub fn protocol(status: StatusCode, message: impl Into<String>) -> Self {
        AnalyzerError::Protocol {
            status: status.as_u16(),
            message: message.into(),
        }
    }

    /// The text shown to the user, without the variant prefix.
    pub fn user_message(&self) -> &str {
        match self {
            AnalyzerError::Network(m)
            | AnalyzerError::Application(m)
            | AnalyzerError::Validation(m)
            | AnalyzerError::Session(m)
            | AnalyzerError::Cache(m) => m,
            AnalyzerError::Protocol { message, .. } => message,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AnalyzerError::Validation(_))
    }
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => AnalyzerError::protocol(status, e.to_string()),
            None => AnalyzerError::Network(e.to_string()),
        }
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(e: std::io::Error) -> Self {
        AnalyzerError::Cache(e.to_string())
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(e: serde_json::Error) -> Self {
        AnalyzerError::Cache(format!("Serialization error: {}", e))
    }
}
