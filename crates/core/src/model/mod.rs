mod ids;
mod progress;
mod question;

pub use ids::{ParseIdError, QuestionId, TopicId, TopicIdError};
pub use progress::{ParseTraversalModeError, ResetScope, TopicProgress, TraversalMode};
pub use question::{Difficulty, EnrichedQuestion, ParseDifficultyError, QuestionRecord};
