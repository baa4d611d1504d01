use std::sync::Arc;

use prep_core::Clock;
use prep_core::model::{QuestionId, ResetScope, TopicId, TopicProgress, TraversalMode};
use storage::repository::ProgressRepository;

/// Owns a topic's progress state and writes every mutation through to the
/// repository immediately.
///
/// Persistence is best-effort: a failed write logs a warning and flips
/// `write_failed`, but the in-memory state stays authoritative for the rest
/// of the session and the operation itself never fails.
pub struct ProgressTracker {
    topic: TopicId,
    repo: Arc<dyn ProgressRepository>,
    clock: Clock,
    progress: TopicProgress,
    write_failed: bool,
}

impl ProgressTracker {
    /// Load persisted progress for a topic, or start empty if the topic has
    /// never been opened.
    ///
    /// A *read* failure also degrades to empty progress rather than blocking
    /// the topic from opening; the condition is logged.
    pub async fn load_or_default(
        topic: TopicId,
        repo: Arc<dyn ProgressRepository>,
        clock: Clock,
    ) -> Self {
        let progress = match repo.get_progress(&topic).await {
            Ok(Some(progress)) => progress,
            Ok(None) => TopicProgress::new(clock.now()),
            Err(err) => {
                tracing::warn!(topic = %topic, error = %err, "failed to load progress, starting empty");
                TopicProgress::new(clock.now())
            }
        };

        Self {
            topic,
            repo,
            clock,
            progress,
            write_failed: false,
        }
    }

    #[must_use]
    pub fn topic(&self) -> &TopicId {
        &self.topic
    }

    #[must_use]
    pub fn progress(&self) -> &TopicProgress {
        &self.progress
    }

    /// True if the most recent persistence attempt failed.
    #[must_use]
    pub fn write_failed(&self) -> bool {
        self.write_failed
    }

    /// Flip bookmark membership; returns the new state (true = bookmarked).
    pub async fn toggle_bookmark(&mut self, id: QuestionId) -> bool {
        let added = self.progress.toggle_bookmark(id);
        self.persist().await;
        added
    }

    /// Idempotent completion; returns true if the question was newly done.
    pub async fn mark_complete(&mut self, id: QuestionId) -> bool {
        let added = self.progress.mark_complete(id);
        if added {
            self.persist().await;
        }
        added
    }

    /// Upsert a note. Empty strings are stored, not treated as deletion.
    pub async fn save_note(&mut self, id: QuestionId, text: impl Into<String>) {
        self.progress.save_note(id, text);
        self.persist().await;
    }

    /// Remove a note, returning the previous text if any.
    pub async fn remove_note(&mut self, id: QuestionId) -> Option<String> {
        let removed = self.progress.remove_note(id);
        if removed.is_some() {
            self.persist().await;
        }
        removed
    }

    pub async fn set_mode(&mut self, mode: TraversalMode) {
        if self.progress.mode() == mode {
            return;
        }
        self.progress.set_mode(mode);
        self.persist().await;
    }

    /// Persist a re-clamped cursor. No write when the value is unchanged.
    pub async fn set_cursor(&mut self, cursor: usize) {
        if self.progress.cursor() == cursor {
            return;
        }
        self.progress.set_cursor(cursor);
        self.persist().await;
    }

    pub async fn reset(&mut self, scope: ResetScope) {
        self.progress.reset(scope);
        self.persist().await;
    }

    async fn persist(&mut self) {
        self.progress.touch(self.clock.now());
        match self.repo.save_progress(&self.topic, &self.progress).await {
            Ok(()) => {
                self.write_failed = false;
            }
            Err(err) => {
                tracing::warn!(
                    topic = %self.topic,
                    error = %err,
                    "failed to persist progress, keeping in-memory state"
                );
                self.write_failed = true;
            }
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use prep_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    fn topic() -> TopicId {
        TopicId::new("angular").unwrap()
    }

    #[tokio::test]
    async fn mutations_write_through_immediately() {
        let repo = InMemoryRepository::new();
        let mut tracker = ProgressTracker::load_or_default(
            topic(),
            Arc::new(repo.clone()),
            fixed_clock(),
        )
        .await;

        assert!(tracker.toggle_bookmark(QuestionId::new(1)).await);
        tracker.save_note(QuestionId::new(1), "check runtime behavior").await;

        let saved = repo.get_progress(&topic()).await.unwrap().unwrap();
        assert!(saved.is_bookmarked(QuestionId::new(1)));
        assert_eq!(saved.note(QuestionId::new(1)), Some("check runtime behavior"));
        assert!(!tracker.write_failed());
    }

    #[tokio::test]
    async fn reload_roundtrips_previous_session_state() {
        let repo = InMemoryRepository::new();
        let arc: Arc<dyn ProgressRepository> = Arc::new(repo.clone());

        let mut tracker =
            ProgressTracker::load_or_default(topic(), arc.clone(), fixed_clock()).await;
        tracker.mark_complete(QuestionId::new(2)).await;
        tracker.set_cursor(5).await;
        tracker.set_mode(TraversalMode::Random).await;

        let reloaded = ProgressTracker::load_or_default(topic(), arc, fixed_clock()).await;
        assert!(reloaded.progress().is_completed(QuestionId::new(2)));
        assert_eq!(reloaded.progress().cursor(), 5);
        assert_eq!(reloaded.progress().mode(), TraversalMode::Random);
    }

    #[tokio::test]
    async fn repeated_completion_does_not_rewrite() {
        let repo = InMemoryRepository::new();
        let mut tracker = ProgressTracker::load_or_default(
            topic(),
            Arc::new(repo.clone()),
            fixed_clock(),
        )
        .await;

        assert!(tracker.mark_complete(QuestionId::new(7)).await);
        assert!(!tracker.mark_complete(QuestionId::new(7)).await);
        let saved = repo.get_progress(&topic()).await.unwrap().unwrap();
        assert_eq!(saved.completed().len(), 1);
    }
}
