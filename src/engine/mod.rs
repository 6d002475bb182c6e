//! # Genre Selection & Playlist Assembly Engine
//!
//! The client-side logic between "start an analysis" and "create playlists".
//!
//! ## Data Flow
//!
//! ```text
//! AnalysisRequest (submit, one request in flight)
//!     ↓ analysis_id
//! BreakdownLoader (breakdown ∥ details → AnalysisResult)
//!     ↓
//! SelectionStore (toggle genre, toggle exclusion, manual assignment, clear)
//!     ↓ snapshot
//! builder::build → PlaylistRequest
//!     ↓
//! PlaylistSubmitter (selective or full-auto)
//! ```
//!
//! Everything here is generic over [`crate::analyzer::AnalysisApi`] and runs
//! on the caller's task: the two loader fetches are joined, not spawned.
//! Selection mutators are synchronous and pure, so a request is always built
//! from a consistent snapshot.

pub mod breakdown;
pub mod builder;
pub mod request;
pub mod selection;
pub mod submitter;

pub use breakdown::{BreakdownLoader, LoadedAnalysis};
pub use builder::build;
pub use request::{AnalysisKind, AnalysisRequest, RequestState};
pub use selection::{SelectionState, SelectionStore, visible_genres};
pub use submitter::PlaylistSubmitter;
