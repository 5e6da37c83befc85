use thiserror::Error;

use crate::model::{ConfigError, QuestionError, SessionResultError, VerbError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Verb(#[from] VerbError),
    #[error(transparent)]
    Result(#[from] SessionResultError),
}
