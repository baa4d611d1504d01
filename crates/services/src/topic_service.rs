use prep_core::Clock;
use prep_core::enrich::enrich;
use prep_core::model::TopicId;
use storage::repository::{QuestionRepository as _, Storage, StorageError};

use crate::error::TopicError;
use crate::progress_tracker::ProgressTracker;
use crate::study_session::StudySession;

/// Handle for one topic load, captured when the load starts.
///
/// Loads are not cancelled when the user switches topics again; instead the
/// caller checks the ticket against the service once the result arrives and
/// drops late results for a topic that is no longer selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    topic: TopicId,
    generation: u64,
}

impl LoadTicket {
    /// The topic that was selected when this load started.
    #[must_use]
    pub fn topic(&self) -> &TopicId {
        &self.topic
    }
}

/// Opens topics: loads the question set, enriches it once, restores the
/// persisted progress, and hands back a ready [`StudySession`].
///
/// An unknown topic identifier falls back to the default topic rather than
/// failing (URL-style parameters can carry anything).
pub struct TopicService {
    storage: Storage,
    clock: Clock,
    default_topic: TopicId,
    generation: u64,
}

impl TopicService {
    #[must_use]
    pub fn new(storage: Storage, clock: Clock, default_topic: TopicId) -> Self {
        Self {
            storage,
            clock,
            default_topic,
            generation: 0,
        }
    }

    #[must_use]
    pub fn default_topic(&self) -> &TopicId {
        &self.default_topic
    }

    /// Record a topic selection and return the ticket guarding its load.
    ///
    /// Starting a new load supersedes every ticket handed out before.
    pub fn begin_open(&mut self, topic: TopicId) -> LoadTicket {
        self.generation += 1;
        LoadTicket {
            topic,
            generation: self.generation,
        }
    }

    /// True if the ticket still corresponds to the latest selection. Late
    /// results for superseded tickets must be dropped by the caller.
    #[must_use]
    pub fn accept(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Perform the load for a ticket.
    ///
    /// The session's own topic may differ from the requested one when the
    /// fallback kicked in; query it via [`StudySession::topic`].
    ///
    /// # Errors
    ///
    /// Returns `TopicError::UnknownTopic` when neither the requested nor the
    /// default topic has a question set, and `TopicError::Load` for other
    /// storage failures. Errors never corrupt previously opened sessions.
    pub async fn fetch(&self, ticket: &LoadTicket) -> Result<StudySession, TopicError> {
        let (topic, records) = match self.storage.questions.topic_questions(&ticket.topic).await {
            Ok(records) => (ticket.topic.clone(), records),
            Err(StorageError::NotFound) if ticket.topic != self.default_topic => {
                tracing::info!(
                    topic = %ticket.topic,
                    fallback = %self.default_topic,
                    "unknown topic, falling back to default"
                );
                let records = self
                    .storage
                    .questions
                    .topic_questions(&self.default_topic)
                    .await
                    .map_err(|err| match err {
                        StorageError::NotFound => {
                            TopicError::UnknownTopic(ticket.topic.clone())
                        }
                        other => TopicError::Load {
                            topic: self.default_topic.clone(),
                            source: other,
                        },
                    })?;
                (self.default_topic.clone(), records)
            }
            Err(StorageError::NotFound) => {
                return Err(TopicError::UnknownTopic(ticket.topic.clone()));
            }
            Err(err) => {
                return Err(TopicError::Load {
                    topic: ticket.topic.clone(),
                    source: err,
                });
            }
        };

        let questions = enrich(records);
        let tracker = ProgressTracker::load_or_default(
            topic.clone(),
            self.storage.progress.clone(),
            self.clock,
        )
        .await;

        tracing::debug!(topic = %topic, count = questions.len(), "topic opened");
        Ok(StudySession::new(questions, tracker).await?)
    }

    /// Convenience: begin, fetch, and accept in one call for callers without
    /// interleaved loads.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch`].
    pub async fn open(&mut self, topic: TopicId) -> Result<StudySession, TopicError> {
        let ticket = self.begin_open(topic);
        self.fetch(&ticket).await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
