//! # Analysis Service Client
//!
//! Typed wrapper over the HTTP endpoints of the genre-analysis service. The
//! service owns the Spotify authorization and the genre classifier; this
//! module only speaks its JSON contract.
//!
//! ## Architecture
//!
//! ```text
//! CLI Layer
//!     ↓
//! Engine (request FSM, breakdown loader, selection, playlist submitter)
//!     ↓
//! AnalysisApi trait  ←  in-memory fakes in tests
//!     ↓
//! AnalysisClient (reqwest, cookie store)
//!     ↓
//! Analysis service
//! ```
//!
//! ## Endpoints
//!
//! - `POST /analyze-liked`, `POST /analyze` - start an analysis ([`analysis`])
//! - `GET /analysis/{id}/breakdown`, `GET /analysis/{id}/details` - results
//! - `GET /user/analyses` - past analyses
//! - `POST /playlists`, `POST /playlists/full-auto` - playlists ([`playlist`])
//! - `GET /health`, `GET /me`, `POST /logout` - session glue ([`session`])
//!
//! ## Failure Classification
//!
//! Every call goes through [`AnalysisClient::fetch`], which maps outcomes onto
//! [`AnalyzerError`]:
//! - no response at all → `Network`
//! - non-2xx status or a body that is not the expected JSON → `Protocol`
//! - well-formed body with `status != "success"` → `Application`
//!
//! The message carried by `Protocol` and `Application` is the first of the
//! body's `detail`, `message` or `error.message` fields, falling back to a
//! per-call generic text. There is no retry logic at this layer.

pub mod analysis;
pub mod playlist;
pub mod session;

use std::collections::BTreeMap;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config, debug,
    error::AnalyzerError,
    types::{
        AnalysisStarted, AnalysisSummary, CreatedPlaylists, FullAutoSummary, GenreShare,
        PlaylistRequest, Track,
    },
};

/// The remote operations the engine depends on.
///
/// The engine components are generic over this trait so that they can be
/// driven by [`AnalysisClient`] in production and by fakes in tests.
#[allow(async_fn_in_trait)]
pub trait AnalysisApi {
    async fn analyze_liked(&self) -> Result<AnalysisStarted, AnalyzerError>;

    async fn analyze_playlist(&self, playlist_id: &str) -> Result<AnalysisStarted, AnalyzerError>;

    async fn breakdown(
        &self,
        analysis_id: &str,
    ) -> Result<BTreeMap<String, GenreShare>, AnalyzerError>;

    async fn details(
        &self,
        analysis_id: &str,
    ) -> Result<BTreeMap<String, Vec<Track>>, AnalyzerError>;

    async fn create_playlists(
        &self,
        request: &PlaylistRequest,
    ) -> Result<CreatedPlaylists, AnalyzerError>;

    async fn create_all_playlists(
        &self,
        analysis_id: &str,
    ) -> Result<FullAutoSummary, AnalyzerError>;

    async fn analyses(&self) -> Result<Vec<AnalysisSummary>, AnalyzerError>;
}

impl<T: AnalysisApi> AnalysisApi for &T {
    async fn analyze_liked(&self) -> Result<AnalysisStarted, AnalyzerError> {
        (**self).analyze_liked().await
    }

    async fn analyze_playlist(&self, playlist_id: &str) -> Result<AnalysisStarted, AnalyzerError> {
        (**self).analyze_playlist(playlist_id).await
    }

    async fn breakdown(
        &self,
        analysis_id: &str,
    ) -> Result<BTreeMap<String, GenreShare>, AnalyzerError> {
        (**self).breakdown(analysis_id).await
    }

    async fn details(
        &self,
        analysis_id: &str,
    ) -> Result<BTreeMap<String, Vec<Track>>, AnalyzerError> {
        (**self).details(analysis_id).await
    }

    async fn create_playlists(
        &self,
        request: &PlaylistRequest,
    ) -> Result<CreatedPlaylists, AnalyzerError> {
        (**self).create_playlists(request).await
    }

    async fn create_all_playlists(
        &self,
        analysis_id: &str,
    ) -> Result<FullAutoSummary, AnalyzerError> {
        (**self).create_all_playlists(analysis_id).await
    }

    async fn analyses(&self) -> Result<Vec<AnalysisSummary>, AnalyzerError> {
        (**self).analyses().await
    }
}

/// HTTP client for the analysis service.
///
/// Cookies set by the service are kept for the lifetime of the client and
/// sent with every request.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    http: Client,
    base_url: String,
}

impl AnalysisClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Scheme, host and port, e.g. `http://127.0.0.1:8080`;
    ///   a trailing slash is removed
    ///
    /// # Errors
    ///
    /// Returns `AnalyzerError::Network` if the underlying HTTP client cannot
    /// be built (for example when no TLS backend can be initialised).
    ///
    /// # Example
    ///
    /// ```
    /// let client = AnalysisClient::new("http://127.0.0.1:8080/")?;
    /// assert_eq!(client.base_url(), "http://127.0.0.1:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self, AnalyzerError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client for the URL configured through `ANALYZER_API_URL`.
    pub fn from_env() -> Result<Self, AnalyzerError> {
        Self::new(config::api_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an endpoint path starting with `/`.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET` request for `path` that asks for JSON.
    pub(crate) fn get(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("GET {}", url);
        self.http.get(url).header("Accept", "application/json")
    }

    /// `POST` request for `path` that asks for JSON. Callers attach the body.
    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("POST {}", url);
        self.http.post(url).header("Accept", "application/json")
    }

    /// Sends `request` and decodes a successful body into `T`.
    ///
    /// # Arguments
    ///
    /// * `request` - A prepared request from [`get`](Self::get) or [`post`](Self::post)
    /// * `fallback` - Message used when a failed response carries none
    ///
    /// # Errors
    ///
    /// - `Network` - the request could not be sent or the body not read
    /// - `Protocol` - non-2xx status, a body that is not JSON, or JSON that
    ///   does not match `T`
    /// - `Application` - a JSON body whose `status` is not `"success"`
    pub(crate) async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, AnalyzerError> {
        let response = request
            .send()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;

        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) => {
                debug!("{} with non-JSON body: {}", status, text);
                let message = if status.is_success() {
                    "The server returned invalid JSON.".to_string()
                } else {
                    fallback.to_string()
                };
                return Err(AnalyzerError::protocol(status, message));
            }
        };

        if !status.is_success() {
            let message = extract_message(&body).unwrap_or_else(|| fallback.to_string());
            return Err(AnalyzerError::protocol(status, message));
        }

        if body.get("status").and_then(Value::as_str) != Some("success") {
            let message = extract_message(&body).unwrap_or_else(|| fallback.to_string());
            return Err(AnalyzerError::Application(message));
        }

        serde_json::from_value(body).map_err(|e| {
            debug!("unexpected response shape: {}", e);
            AnalyzerError::protocol(status, "The server returned an unexpected response.")
        })
    }
}

/// Picks the server-provided error text out of a response body.
///
/// Looks at `detail`, then `message`, then `error.message`. Blank strings are
/// treated as absent.
pub fn extract_message(body: &Value) -> Option<String> {
    let candidates = [
        body.get("detail"),
        body.get("message"),
        body.get("error").and_then(|e| e.get("message")),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

impl AnalysisApi for AnalysisClient {
    async fn analyze_liked(&self) -> Result<AnalysisStarted, AnalyzerError> {
        self.start_liked_analysis().await
    }

    async fn analyze_playlist(&self, playlist_id: &str) -> Result<AnalysisStarted, AnalyzerError> {
        self.start_playlist_analysis(playlist_id).await
    }

    async fn breakdown(
        &self,
        analysis_id: &str,
    ) -> Result<BTreeMap<String, GenreShare>, AnalyzerError> {
        self.get_breakdown(analysis_id).await
    }

    async fn details(
        &self,
        analysis_id: &str,
    ) -> Result<BTreeMap<String, Vec<Track>>, AnalyzerError> {
        self.get_details(analysis_id).await
    }

    async fn create_playlists(
        &self,
        request: &PlaylistRequest,
    ) -> Result<CreatedPlaylists, AnalyzerError> {
        self.post_playlists(request).await
    }

    async fn create_all_playlists(
        &self,
        analysis_id: &str,
    ) -> Result<FullAutoSummary, AnalyzerError> {
        self.post_full_auto(analysis_id).await
    }

    async fn analyses(&self) -> Result<Vec<AnalysisSummary>, AnalyzerError> {
        self.get_analyses().await
    }
}
