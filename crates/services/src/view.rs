use serde::Serialize;

use prep_core::model::{EnrichedQuestion, TraversalMode};

/// Snapshot of the study session for one render: the current question plus
/// everything the UI needs to draw navigation and progress affordances.
///
/// `question` and `index` are absent together when the ordered, filtered
/// list is empty ("no questions match").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyView {
    pub question: Option<EnrichedQuestion>,
    pub index: Option<usize>,
    pub total: usize,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    pub is_bookmarked: bool,
    pub is_completed: bool,
    pub note: String,
    pub mode: TraversalMode,
}

impl StudyView {
    /// True when the filters produced zero questions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
