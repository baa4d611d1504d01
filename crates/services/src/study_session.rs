use rand::Rng;
use rand::seq::SliceRandom;

use prep_core::cursor::{next_index, prev_index, safe_index};
use prep_core::filter::{self, FilterCriteria};
use prep_core::model::{EnrichedQuestion, QuestionId, ResetScope, TopicId, TraversalMode};
use prep_core::order::ShufflePlan;

use crate::error::SessionError;
use crate::progress_tracker::ProgressTracker;
use crate::view::StudyView;

/// The question navigation engine for one open topic.
///
/// Holds the enriched question set, the transient filter criteria, and the
/// shuffle plan, and derives the ordered, filtered list on every query. The
/// persisted cursor is re-clamped (and the clamped value written back)
/// whenever the derived list changes length, so widening a filter later
/// never jumps the cursor to a stale position.
pub struct StudySession {
    questions: Vec<EnrichedQuestion>,
    criteria: FilterCriteria,
    plan: Option<ShufflePlan>,
    tracker: ProgressTracker,
}

impl std::fmt::Debug for StudySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudySession")
            .field("questions", &self.questions.len())
            .field("criteria", &self.criteria)
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}

impl StudySession {
    /// Build a session over an already-enriched question set.
    ///
    /// If the persisted mode is random, the shuffle plan is computed here,
    /// once, against the unfiltered count. The persisted cursor is clamped
    /// against the initial list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the shuffle plan cannot be built.
    pub async fn new(
        questions: Vec<EnrichedQuestion>,
        tracker: ProgressTracker,
    ) -> Result<Self, SessionError> {
        let mut session = Self {
            questions,
            criteria: FilterCriteria::none(),
            plan: None,
            tracker,
        };

        if session.mode().is_shuffled() {
            session.plan = Some(session.build_plan(&mut rand::rng())?);
        }
        session.sync_cursor().await;
        Ok(session)
    }

    #[must_use]
    pub fn topic(&self) -> &TopicId {
        self.tracker.topic()
    }

    #[must_use]
    pub fn mode(&self) -> TraversalMode {
        self.tracker.progress().mode()
    }

    #[must_use]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Number of questions in the topic before filtering.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// True if the most recent progress write failed (the in-memory state
    /// is still authoritative for this session).
    #[must_use]
    pub fn write_failed(&self) -> bool {
        self.tracker.write_failed()
    }

    /// The ordered, filtered list for the current criteria and mode.
    fn ordered(&self) -> Vec<&EnrichedQuestion> {
        let filtered = filter::apply(
            &self.questions,
            &self.criteria,
            self.mode(),
            self.tracker.progress().bookmarked(),
        );

        match (&self.plan, self.mode().is_shuffled()) {
            (Some(plan), true) => plan.apply(&filtered),
            _ => filtered,
        }
    }

    /// Snapshot for the UI: current question, position, and per-question
    /// progress flags.
    #[must_use]
    pub fn view(&self) -> StudyView {
        let ordered = self.ordered();
        let total = ordered.len();
        let progress = self.tracker.progress();
        let index = safe_index(progress.cursor(), total);
        let question = index.map(|i| ordered[i].clone());

        let (is_bookmarked, is_completed, note) = question.as_ref().map_or(
            (false, false, String::new()),
            |q| {
                (
                    progress.is_bookmarked(q.id),
                    progress.is_completed(q.id),
                    progress.note(q.id).unwrap_or_default().to_string(),
                )
            },
        );

        StudyView {
            can_go_prev: index.is_some_and(|i| i > 0),
            can_go_next: index.is_some_and(|i| i + 1 < total),
            question,
            index,
            total,
            is_bookmarked,
            is_completed,
            note,
            mode: self.mode(),
        }
    }

    /// Advance to the next question, marking the current one complete.
    ///
    /// Moving past a question is what completes it; this is the deliberate
    /// compound operation, not a hidden side effect of a generic "next".
    /// Saturates at the end of the list. No-op when no question is current.
    pub async fn complete_and_advance(&mut self) {
        let (current_id, index, total) = {
            let ordered = self.ordered();
            let total = ordered.len();
            let Some(index) = safe_index(self.tracker.progress().cursor(), total) else {
                return;
            };
            (ordered[index].id, index, total)
        };

        self.tracker.mark_complete(current_id).await;
        self.tracker.set_cursor(next_index(index, total)).await;
    }

    /// Move to the previous question. Saturates at the start; never
    /// completes anything.
    pub async fn go_back(&mut self) {
        let total = self.ordered().len();
        let Some(index) = safe_index(self.tracker.progress().cursor(), total) else {
            return;
        };
        self.tracker.set_cursor(prev_index(index)).await;
    }

    /// Jump directly to a position (question picker). Clamped; no
    /// completion side effect.
    pub async fn jump_to(&mut self, target: usize) {
        let total = self.ordered().len();
        if let Some(index) = safe_index(target, total) {
            self.tracker.set_cursor(index).await;
        }
    }

    /// Replace the filter criteria and re-clamp the cursor against the new
    /// list. The shuffle plan is deliberately left alone.
    pub async fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.sync_cursor().await;
    }

    /// Switch traversal mode. Switching *into* random mode is a shuffle
    /// trigger and recomputes the plan; setting random while already random
    /// keeps the current order (reordering in place is [`Self::reshuffle`]).
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the shuffle plan cannot be built.
    pub async fn set_mode(&mut self, mode: TraversalMode) -> Result<(), SessionError> {
        let entering_random = mode.is_shuffled() && self.mode() != mode;
        self.tracker.set_mode(mode).await;
        if entering_random || (mode.is_shuffled() && self.plan.is_none()) {
            self.plan = Some(self.build_plan(&mut rand::rng())?);
        }
        self.sync_cursor().await;
        Ok(())
    }

    /// Recompute the shuffle plan on explicit user request.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the shuffle plan cannot be built.
    pub async fn reshuffle(&mut self) -> Result<(), SessionError> {
        self.reshuffle_with(&mut rand::rng()).await
    }

    /// Deterministic variant of [`Self::reshuffle`] for tests.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the shuffle plan cannot be built.
    pub async fn reshuffle_with<R: Rng>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        self.plan = Some(self.build_plan(rng)?);
        self.sync_cursor().await;
        Ok(())
    }

    /// Flip bookmark state for a question; returns the new membership.
    ///
    /// In bookmarked mode this can shrink the visible list, so the cursor is
    /// re-clamped afterwards.
    pub async fn toggle_bookmark(&mut self, id: QuestionId) -> bool {
        let added = self.tracker.toggle_bookmark(id).await;
        self.sync_cursor().await;
        added
    }

    /// Upsert a note for a question. Empty text stores an empty note.
    pub async fn save_note(&mut self, id: QuestionId, text: impl Into<String>) {
        self.tracker.save_note(id, text).await;
    }

    /// Clear progress. `ResetScope::All` can empty the bookmarked-mode
    /// list, so the cursor is re-clamped afterwards.
    pub async fn reset(&mut self, scope: ResetScope) {
        self.tracker.reset(scope).await;
        self.sync_cursor().await;
    }

    fn build_plan<R: Rng>(&self, rng: &mut R) -> Result<ShufflePlan, SessionError> {
        let mut permutation: Vec<usize> = (0..self.questions.len()).collect();
        permutation.shuffle(rng);
        Ok(ShufflePlan::new(permutation)?)
    }

    /// Re-clamp the persisted cursor against the current list length. When
    /// the list is empty there is nothing to clamp against and the stored
    /// cursor is left for the next non-empty recomputation.
    async fn sync_cursor(&mut self) {
        let total = self.ordered().len();
        if let Some(index) = safe_index(self.tracker.progress().cursor(), total) {
            self.tracker.set_cursor(index).await;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
