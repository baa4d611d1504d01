//! Shared error types for the services crate.

use thiserror::Error;

use prep_core::model::TopicId;
use prep_core::order::ShuffleError;
use storage::repository::StorageError;

/// Errors emitted by `StudySession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error(transparent)]
    Shuffle(#[from] ShuffleError),
}

/// Errors emitted while opening a topic.
///
/// Persistence *write* failures never surface here; the progress tracker
/// degrades gracefully and keeps the in-memory state authoritative.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TopicError {
    #[error("no question set for topic '{0}' or the default topic")]
    UnknownTopic(TopicId),

    #[error("failed to load questions for topic '{topic}'")]
    Load {
        topic: TopicId,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Session(#[from] SessionError),
}
