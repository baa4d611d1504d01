use thiserror::Error;

use crate::model::{ParseIdError, TopicIdError};
use crate::order::ShuffleError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
    #[error(transparent)]
    Topic(#[from] TopicIdError),
    #[error(transparent)]
    Shuffle(#[from] ShuffleError),
}
