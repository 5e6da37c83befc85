mod config;
mod question;
mod result;
mod verb;

pub use config::{
    AnswerStyle, CategoryFilter, CategoryName, ConfigError, GUEST_USERNAME, PracticeMode,
    QuestionLimit, SessionConfig,
};
pub use question::{AnswerKey, QuestionError, QuestionItem};
pub use result::{SessionResult, SessionResultError};
pub use verb::{VerbEntry, VerbError};
