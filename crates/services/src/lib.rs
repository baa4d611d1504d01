#![forbid(unsafe_code)]

pub mod error;
pub mod progress_tracker;
pub mod study_session;
pub mod topic_service;
pub mod view;

pub use prep_core::Clock;

pub use error::{SessionError, TopicError};
pub use progress_tracker::ProgressTracker;
pub use study_session::StudySession;
pub use topic_service::{LoadTicket, TopicService};
pub use view::StudyView;
