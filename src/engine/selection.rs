use std::collections::BTreeMap;

use crate::{
    error::AnalyzerError,
    types::{AnalysisResult, UNKNOWN_GENRE},
};

/// The user's edits on top of one analysis result.
///
/// Mutators are pure: each returns the next state and leaves `self` alone.
/// `selected_genres` and `excluded_track_ids` keep the order in which entries
/// were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_genres: Vec<String>,
    pub excluded_track_ids: Vec<String>,
    pub manual_assignments: BTreeMap<String, String>,
}

impl SelectionState {
    /// An empty selection: no genres, no exclusions, no assignments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `genre`, or deselects it when it is already selected.
    ///
    /// A newly selected genre is appended, so [`visible_genres`] lists genres
    /// in the order the user picked them. Toggling twice yields a state equal
    /// to the original.
    ///
    /// # Arguments
    ///
    /// * `genre` - Genre key as it appears in the breakdown, e.g. `"rock"`
    ///
    /// # Example
    ///
    /// ```
    /// let state = SelectionState::new().toggle_genre("rock");
    /// assert!(state.is_selected("rock"));
    /// assert!(!state.toggle_genre("rock").is_selected("rock"));
    /// ```
    #[must_use]
    pub fn toggle_genre(&self, genre: &str) -> Self {
        let mut next = self.clone();
        toggle(&mut next.selected_genres, genre);
        next
    }

    /// Excludes `track_id`, or includes it again when already excluded.
    ///
    /// Exclusion does not depend on genre selection: an excluded track is
    /// left out of every genre of the built request, including genres it was
    /// manually assigned to.
    #[must_use]
    pub fn toggle_exclude(&self, track_id: &str) -> Self {
        let mut next = self.clone();
        toggle(&mut next.excluded_track_ids, track_id);
        next
    }

    /// Routes `track_id` to `genre`; an empty genre clears the assignment.
    ///
    /// The target genre is not added to `selected_genres`, and the track ends
    /// up in the request even when its genre stays unselected. No check is
    /// made that the track belongs to the `"unknown"` bucket; use
    /// [`SelectionStore::assign`] for that.
    ///
    /// # Arguments
    ///
    /// * `track_id` - Track to route
    /// * `genre` - Target genre; surrounding whitespace is trimmed
    #[must_use]
    pub fn set_manual_assignment(&self, track_id: &str, genre: &str) -> Self {
        let mut next = self.clone();
        let genre = genre.trim();
        if genre.is_empty() {
            next.manual_assignments.remove(track_id);
        } else {
            next.manual_assignments
                .insert(track_id.to_string(), genre.to_string());
        }
        next
    }

    /// Drops every selection, exclusion and assignment.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::default()
    }

    pub fn is_selected(&self, genre: &str) -> bool {
        self.selected_genres.iter().any(|g| g == genre)
    }

    pub fn is_excluded(&self, track_id: &str) -> bool {
        self.excluded_track_ids.iter().any(|t| t == track_id)
    }

    /// Target genre of a manual assignment, if any.
    pub fn assignment(&self, track_id: &str) -> Option<&str> {
        self.manual_assignments.get(track_id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.selected_genres.is_empty()
            && self.excluded_track_ids.is_empty()
            && self.manual_assignments.is_empty()
    }
}

fn toggle(items: &mut Vec<String>, item: &str) {
    if let Some(pos) = items.iter().position(|i| i == item) {
        items.remove(pos);
    } else {
        items.push(item.to_string());
    }
}

/// Selected genres that exist in `result`, in selection order.
///
/// Genres that were selected but are missing from the result (for example
/// after switching analyses by hand) are skipped.
pub fn visible_genres<'a>(result: &AnalysisResult, state: &'a SelectionState) -> Vec<&'a str> {
    state
        .selected_genres
        .iter()
        .filter(|g| result.buckets.contains_key(g.as_str()))
        .map(String::as_str)
        .collect()
}

/// Selection state bound to a single analysis.
///
/// Switching to another `analysis_id` discards every edit, so a state is
/// never applied to a result it was not made for.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    analysis_id: String,
    state: SelectionState,
}

impl SelectionStore {
    /// An empty selection bound to `analysis_id`.
    pub fn new(analysis_id: &str) -> Self {
        Self {
            analysis_id: analysis_id.to_string(),
            state: SelectionState::new(),
        }
    }

    pub fn analysis_id(&self) -> &str {
        &self.analysis_id
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// A consistent copy to build a request from.
    pub fn snapshot(&self) -> SelectionState {
        self.state.clone()
    }

    /// Binds the store to `analysis_id`, resetting it when the id changes.
    ///
    /// Loading the same analysis again keeps the current selection. Any other
    /// id starts from an empty [`SelectionState`].
    ///
    /// # Example
    ///
    /// ```
    /// let mut store = SelectionStore::new("an-1");
    /// store.toggle_genre("rock");
    /// store.reset_for("an-2");
    /// assert!(store.state().is_empty());
    /// ```
    pub fn reset_for(&mut self, analysis_id: &str) -> &mut Self {
        if self.analysis_id != analysis_id {
            self.analysis_id = analysis_id.to_string();
            self.state = SelectionState::new();
        }
        self
    }

    pub fn toggle_genre(&mut self, genre: &str) -> &mut Self {
        self.state = self.state.toggle_genre(genre);
        self
    }

    pub fn toggle_exclude(&mut self, track_id: &str) -> &mut Self {
        self.state = self.state.toggle_exclude(track_id);
        self
    }

    /// Sets or clears a manual assignment for a track of the `"unknown"` bucket.
    ///
    /// # Arguments
    ///
    /// * `result` - The loaded analysis the store is bound to
    /// * `track_id` - A track listed in the `"unknown"` bucket of `result`
    /// * `genre` - Target genre; empty clears the assignment
    ///
    /// # Errors
    ///
    /// Returns `AnalyzerError::Validation` and leaves the state untouched when
    /// - `result` belongs to another analysis
    /// - track details of `result` are not loaded
    /// - the track is not in the `"unknown"` bucket
    pub fn assign(
        &mut self,
        result: &AnalysisResult,
        track_id: &str,
        genre: &str,
    ) -> Result<&mut Self, AnalyzerError> {
        if result.analysis_id != self.analysis_id {
            return Err(AnalyzerError::Validation(format!(
                "Selection belongs to analysis {}, not {}.",
                self.analysis_id, result.analysis_id
            )));
        }
        if !result.has_track_details() {
            return Err(AnalyzerError::Validation(
                "Track details are not loaded yet.".to_string(),
            ));
        }
        if !result.is_unknown_track(track_id) {
            return Err(AnalyzerError::Validation(format!(
                "Only tracks of the \"{}\" bucket can be reassigned.",
                UNKNOWN_GENRE
            )));
        }

        self.state = self.state.set_manual_assignment(track_id, genre);
        Ok(self)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.state = self.state.clear();
        self
    }
}
