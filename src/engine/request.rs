use std::{fmt, sync::Arc, time::Duration};

use tokio::{sync::Mutex, time::sleep};

use crate::{analyzer::AnalysisApi, debug, types::Session};

pub const NOT_LOGGED_IN: &str = "You are not logged in. Run `genrecli auth` first.";

pub const CANCELLED: &str = "Analysis was cancelled.";

/// What to analyse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisKind {
    Liked,
    Playlist(String),
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisKind::Liked => write!(f, "liked songs"),
            AnalysisKind::Playlist(id) => write!(f, "playlist {}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Submitting,
    Succeeded(String),
    Failed(String),
}

impl RequestState {
    pub fn analysis_id(&self) -> Option<&str> {
        match self {
            RequestState::Succeeded(id) => Some(id),
            _ => None,
        }
    }
}

/// Submission of a new analysis.
///
/// `Idle → Submitting → Succeeded(id) | Failed(message)`. At most one request
/// is in flight: calling [`submit`](Self::submit) while `Submitting` returns
/// the current state without touching the network. There is no automatic
/// retry; a new `submit` after `Failed` goes through `Idle` again.
///
/// A `submit` future that is dropped while the request is in flight moves the
/// state to `Failed("Analysis was cancelled.")`, so the user can submit again.
pub struct AnalysisRequest<A> {
    api: A,
    session: Session,
    state: Arc<Mutex<RequestState>>,
    handoff_delay: Duration,
}

impl<A: AnalysisApi> AnalysisRequest<A> {
    /// Creates a request in `Idle` for the given login context.
    ///
    /// # Arguments
    ///
    /// * `api` - The analysis service, usually `&AnalysisClient`
    /// * `session` - Login context; a logged-out session never reaches the network
    ///
    /// The hand-off delay starts at zero, see [`with_handoff_delay`](Self::with_handoff_delay).
    pub fn new(api: A, session: Session) -> Self {
        Self {
            api,
            session,
            state: Arc::new(Mutex::new(RequestState::Idle)),
            handoff_delay: Duration::ZERO,
        }
    }

    /// Waits this long after `Succeeded` before `submit` returns.
    pub fn with_handoff_delay(mut self, delay: Duration) -> Self {
        self.handoff_delay = delay;
        self
    }

    /// Current state, e.g. to render a disabled trigger while `Submitting`.
    pub async fn state(&self) -> RequestState {
        self.state.lock().await.clone()
    }

    /// Starts an analysis unless one is already in flight.
    ///
    /// # Arguments
    ///
    /// * `kind` - Liked songs, or a playlist id (surrounding whitespace is ignored)
    ///
    /// # Returns
    ///
    /// The state the call left behind:
    /// - `Submitting` - another call is in flight; nothing was sent
    /// - `Succeeded(id)` - the service accepted the analysis
    /// - `Failed(message)` - not logged in, blank playlist id, missing
    ///   `analysis_id` or any [`AnalyzerError`](crate::error::AnalyzerError)
    ///
    /// # Example
    ///
    /// ```
    /// let request = AnalysisRequest::new(&client, session);
    /// match request.submit(AnalysisKind::Liked).await {
    ///     RequestState::Succeeded(id) => println!("analysis {}", id),
    ///     RequestState::Failed(message) => eprintln!("{}", message),
    ///     _ => {}
    /// }
    /// ```
    pub async fn submit(&self, kind: AnalysisKind) -> RequestState {
        {
            let mut state = self.state.lock().await;
            if *state == RequestState::Submitting {
                debug!("analysis already in flight, ignoring submit for {}", kind);
                return state.clone();
            }
            if matches!(*state, RequestState::Failed(_) | RequestState::Succeeded(_)) {
                *state = RequestState::Idle;
            }

            if !self.session.is_logged_in {
                *state = RequestState::Failed(NOT_LOGGED_IN.to_string());
                return state.clone();
            }

            if let AnalysisKind::Playlist(id) = &kind {
                if id.trim().is_empty() {
                    *state = RequestState::Failed("A playlist URL or id is required.".to_string());
                    return state.clone();
                }
            }

            debug!("submitting analysis of {}", kind);
            *state = RequestState::Submitting;
        }

        let in_flight = InFlight::new(self.state.clone());

        let response = match &kind {
            AnalysisKind::Liked => self.api.analyze_liked().await,
            AnalysisKind::Playlist(id) => self.api.analyze_playlist(id.trim()).await,
        };

        let next = match response {
            Ok(started) => match started.analysis_id {
                Some(id) if !id.trim().is_empty() => RequestState::Succeeded(id),
                _ => RequestState::Failed("Analysis failed.".to_string()),
            },
            Err(e) => RequestState::Failed(e.user_message().to_string()),
        };
        debug!("analysis request finished: {:?}", next);

        *self.state.lock().await = next.clone();
        in_flight.disarm();

        if next.analysis_id().is_some() && !self.handoff_delay.is_zero() {
            sleep(self.handoff_delay).await;
        }
        next
    }
}

/// Leaves `Submitting` when a `submit` future is dropped before it finished.
///
/// A dropped call would otherwise keep the state in `Submitting`, and every
/// later `submit` would be ignored.
struct InFlight {
    state: Arc<Mutex<RequestState>>,
    armed: bool,
}

impl InFlight {
    fn new(state: Arc<Mutex<RequestState>>) -> Self {
        Self { state, armed: true }
    }

    /// Called once the final state has been written.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        debug!("analysis request dropped while in flight");
        match self.state.try_lock() {
            Ok(mut state) => cancel(&mut state),
            Err(_) => {
                // Someone holds the lock for a moment; finish the reset on the runtime.
                if let Ok(handle) = tokio::runtime::Handle::try_current() {
                    let state = self.state.clone();
                    handle.spawn(async move {
                        cancel(&mut *state.lock().await);
                    });
                }
            }
        }
    }
}

fn cancel(state: &mut RequestState) {
    if *state == RequestState::Submitting {
        *state = RequestState::Failed(CANCELLED.to_string());
    }
}
