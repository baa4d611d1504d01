use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── TRAVERSAL MODE ────────────────────────────────────────────────────────────
//

/// Strategy governing the order in which questions are presented.
///
/// Persisted per topic alongside the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalMode {
    #[default]
    Sequential,
    Random,
    Bookmarked,
}

impl TraversalMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TraversalMode::Sequential => "sequential",
            TraversalMode::Random => "random",
            TraversalMode::Bookmarked => "bookmarked",
        }
    }

    /// Returns true if this mode traverses via a shuffled permutation.
    #[must_use]
    pub fn is_shuffled(&self) -> bool {
        matches!(self, TraversalMode::Random)
    }
}

impl fmt::Display for TraversalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid traversal mode: {raw}")]
pub struct ParseTraversalModeError {
    raw: String,
}

impl FromStr for TraversalMode {
    type Err = ParseTraversalModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(TraversalMode::Sequential),
            "random" => Ok(TraversalMode::Random),
            "bookmarked" => Ok(TraversalMode::Bookmarked),
            other => Err(ParseTraversalModeError {
                raw: other.to_string(),
            }),
        }
    }
}

//
// ─── RESET SCOPE ───────────────────────────────────────────────────────────────
//

/// How much of a topic's progress a reset clears.
///
/// `Completion` clears the completed set and the cursor; `All` additionally
/// clears bookmarks and notes. The traversal mode survives either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetScope {
    Completion,
    All,
}

//
// ─── TOPIC PROGRESS ────────────────────────────────────────────────────────────
//

/// Persisted per-topic learner state: completed and bookmarked question
/// sets, free-text notes, the traversal mode, and the cursor position.
///
/// Exclusively owned by the progress tracker; every mutation is written back
/// to storage immediately by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicProgress {
    completed: HashSet<QuestionId>,
    bookmarked: HashSet<QuestionId>,
    notes: HashMap<QuestionId, String>,
    cursor: usize,
    mode: TraversalMode,
    updated_at: DateTime<Utc>,
}

impl TopicProgress {
    /// Empty progress for a topic opened for the first time.
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            completed: HashSet::new(),
            bookmarked: HashSet::new(),
            notes: HashMap::new(),
            cursor: 0,
            mode: TraversalMode::Sequential,
            updated_at: now,
        }
    }

    /// Rehydrate progress from persisted storage.
    #[must_use]
    pub fn from_persisted(
        completed: HashSet<QuestionId>,
        bookmarked: HashSet<QuestionId>,
        notes: HashMap<QuestionId, String>,
        cursor: usize,
        mode: TraversalMode,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            completed,
            bookmarked,
            notes,
            cursor,
            mode,
            updated_at,
        }
    }

    #[must_use]
    pub fn completed(&self) -> &HashSet<QuestionId> {
        &self.completed
    }

    #[must_use]
    pub fn bookmarked(&self) -> &HashSet<QuestionId> {
        &self.bookmarked
    }

    #[must_use]
    pub fn notes(&self) -> &HashMap<QuestionId, String> {
        &self.notes
    }

    #[must_use]
    pub fn is_completed(&self, id: QuestionId) -> bool {
        self.completed.contains(&id)
    }

    #[must_use]
    pub fn is_bookmarked(&self, id: QuestionId) -> bool {
        self.bookmarked.contains(&id)
    }

    #[must_use]
    pub fn note(&self, id: QuestionId) -> Option<&str> {
        self.notes.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn mode(&self) -> TraversalMode {
        self.mode
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Flip bookmark membership for a question.
    ///
    /// Returns the new membership state (true = now bookmarked), which the
    /// caller uses to pick a notification.
    pub fn toggle_bookmark(&mut self, id: QuestionId) -> bool {
        if self.bookmarked.remove(&id) {
            false
        } else {
            self.bookmarked.insert(id);
            true
        }
    }

    /// Idempotent add to the completed set.
    ///
    /// Returns true if the question was newly completed.
    pub fn mark_complete(&mut self, id: QuestionId) -> bool {
        self.completed.insert(id)
    }

    /// Upsert a note for a question.
    ///
    /// An empty string is a valid note and keeps the key present; "has a
    /// note" is key presence, and clearing is an explicit [`Self::remove_note`].
    pub fn save_note(&mut self, id: QuestionId, text: impl Into<String>) {
        self.notes.insert(id, text.into());
    }

    /// Remove a note, returning the previous text if any.
    pub fn remove_note(&mut self, id: QuestionId) -> Option<String> {
        self.notes.remove(&id)
    }

    /// Persist a new traversal mode. Does not touch the cursor; re-clamping
    /// happens once the new mode's list length is known.
    pub fn set_mode(&mut self, mode: TraversalMode) {
        self.mode = mode;
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor;
    }

    /// Clear progress according to scope. Completed set and cursor go
    /// unconditionally; bookmarks and notes only under [`ResetScope::All`].
    pub fn reset(&mut self, scope: ResetScope) {
        self.completed.clear();
        self.cursor = 0;
        if scope == ResetScope::All {
            self.bookmarked.clear();
            self.notes.clear();
        }
    }

    /// Stamp the last-modified time. Called by the owner after a mutation.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
