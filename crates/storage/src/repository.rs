use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use prep_core::model::{QuestionRecord, TopicId, TopicProgress};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for topic question sets.
///
/// Question records are the raw, possibly-unclassified shape; enrichment
/// happens in the services layer after loading.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Fetch a topic's question set in its authored order.
    ///
    /// There is no standalone topic registry: a topic with zero questions is
    /// indistinguishable from one that never existed, and both report
    /// `NotFound`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for a topic with no question set, or
    /// other storage errors.
    async fn topic_questions(&self, topic: &TopicId) -> Result<Vec<QuestionRecord>, StorageError>;

    /// Replace a topic's question set. Replacing with an empty slice
    /// effectively removes the topic.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the records cannot be stored.
    async fn replace_questions(
        &self,
        topic: &TopicId,
        records: &[QuestionRecord],
    ) -> Result<(), StorageError>;

    /// List every topic that has a question set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_topics(&self) -> Result<Vec<TopicId>, StorageError>;
}

/// Repository contract for per-topic learner progress.
///
/// Progress is keyed by topic identifier so different topics never collide.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch a topic's progress, or `None` for a topic never opened.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_progress(&self, topic: &TopicId)
    -> Result<Option<TopicProgress>, StorageError>;

    /// Persist the full progress state for a topic.
    ///
    /// Callers write on every mutation; there is no batching.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be stored.
    async fn save_progress(
        &self,
        topic: &TopicId,
        progress: &TopicProgress,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<HashMap<TopicId, Vec<QuestionRecord>>>>,
    progress: Arc<Mutex<HashMap<TopicId, TopicProgress>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn topic_questions(&self, topic: &TopicId) -> Result<Vec<QuestionRecord>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(topic)
            .filter(|records| !records.is_empty())
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn replace_questions(
        &self,
        topic: &TopicId,
        records: &[QuestionRecord],
    ) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(topic.clone(), records.to_vec());
        Ok(())
    }

    async fn list_topics(&self) -> Result<Vec<TopicId>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut topics: Vec<TopicId> = guard
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(topic, _)| topic.clone())
            .collect();
        topics.sort();
        Ok(topics)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn get_progress(
        &self,
        topic: &TopicId,
    ) -> Result<Option<TopicProgress>, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(topic).cloned())
    }

    async fn save_progress(
        &self,
        topic: &TopicId,
        progress: &TopicProgress,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(topic.clone(), progress.clone());
        Ok(())
    }
}

/// Aggregates question and progress repositories behind trait objects for
/// easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            questions,
            progress,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
