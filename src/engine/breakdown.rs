use crate::{analyzer::AnalysisApi, debug, error::AnalyzerError, types::AnalysisResult};

/// Outcome of loading one analysis.
///
/// The result is usable in part when only one of the two fetches failed:
/// without the breakdown there is no chart, without the details there is no
/// track-level selection.
#[derive(Debug, Clone)]
pub struct LoadedAnalysis {
    pub result: AnalysisResult,
    pub breakdown_error: Option<AnalyzerError>,
    pub details_error: Option<AnalyzerError>,
}

impl LoadedAnalysis {
    pub fn analysis_id(&self) -> &str {
        &self.result.analysis_id
    }

    /// The error to report for this load, if the breakdown is missing.
    pub fn load_error(&self) -> Option<&AnalyzerError> {
        self.breakdown_error.as_ref()
    }

    pub fn chart_available(&self) -> bool {
        self.breakdown_error.is_none() && self.result.has_breakdown()
    }

    pub fn track_selection_available(&self) -> bool {
        self.details_error.is_none() && self.result.has_track_details()
    }

    /// Nothing at all could be loaded.
    pub fn is_empty(&self) -> bool {
        !self.chart_available() && !self.track_selection_available()
    }
}

/// Loads the breakdown and the track details of an analysis.
pub struct BreakdownLoader<A> {
    api: A,
}

impl<A: AnalysisApi> BreakdownLoader<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Fetches breakdown and details concurrently and merges them.
    ///
    /// Both requests are in flight at the same time. Each half is applied to
    /// the result independently, so the outcome does not depend on which one
    /// answers first.
    ///
    /// # Arguments
    ///
    /// * `analysis_id` - Id returned by a successful analysis submission
    ///
    /// # Returns
    ///
    /// A [`LoadedAnalysis`] that is never an error on its own. Failures are
    /// kept per half:
    /// - breakdown failed - `load_error()` is set, the chart is unavailable,
    ///   the buckets still carry their tracks with zero counts
    /// - details failed - the chart is available, track selection is not
    ///   until [`reload_details`](Self::reload_details) succeeds
    ///
    /// # Example
    ///
    /// ```
    /// let loaded = BreakdownLoader::new(&client).load("an-1").await;
    /// if let Some(e) = loaded.load_error() {
    ///     eprintln!("{}", e.user_message());
    /// }
    /// ```
    pub async fn load(&self, analysis_id: &str) -> LoadedAnalysis {
        let (breakdown, details) =
            tokio::join!(self.api.breakdown(analysis_id), self.api.details(analysis_id));

        let mut result = AnalysisResult::new(analysis_id);
        let breakdown_error = match breakdown {
            Ok(shares) => {
                result.apply_breakdown(shares);
                None
            }
            Err(e) => {
                debug!("breakdown fetch for {} failed: {}", analysis_id, e);
                Some(e)
            }
        };
        let details_error = match details {
            Ok(tracks) => {
                result.apply_details(tracks);
                None
            }
            Err(e) => {
                debug!("details fetch for {} failed: {}", analysis_id, e);
                Some(e)
            }
        };

        LoadedAnalysis {
            result,
            breakdown_error,
            details_error,
        }
    }

    /// Retries only the details fetch of a partially loaded analysis.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, which is also stored in `details_error`. The
    /// breakdown half of `loaded` is left as it was.
    pub async fn reload_details(&self, loaded: &mut LoadedAnalysis) -> Result<(), AnalyzerError> {
        let analysis_id = loaded.analysis_id().to_string();
        let fetched = self.api.details(&analysis_id).await;
        match fetched {
            Ok(tracks) => {
                loaded.result.apply_details(tracks);
                loaded.details_error = None;
                Ok(())
            }
            Err(e) => {
                loaded.details_error = Some(e.clone());
                Err(e)
            }
        }
    }
}
