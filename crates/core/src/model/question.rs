use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors raised when building quiz questions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be blank")]
    BlankPrompt,

    #[error("free-text questions need at least one accepted answer")]
    NoAcceptedAnswers,

    #[error("accepted answers cannot be blank")]
    BlankAnswer,

    #[error("multiple-choice questions need at least two options")]
    TooFewOptions,

    #[error("options cannot be blank")]
    BlankOption,

    #[error("correct index {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// How a question is judged.
///
/// Exactly one matching rule applies per question: free-text items compare
/// the typed input against their accepted answers, multiple-choice items
/// compare the selected index against `correct_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// Typed answer; any of the accepted variants counts as correct.
    FreeText { answers: Vec<String> },
    /// Pick-one item; `correct_index` points at the right option.
    MultipleChoice {
        options: Vec<String>,
        correct_index: usize,
    },
}

impl AnswerKey {
    /// Build a validated free-text key.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoAcceptedAnswers` when `answers` is empty
    /// and `QuestionError::BlankAnswer` when any variant is blank.
    pub fn free_text(answers: Vec<String>) -> Result<Self, QuestionError> {
        let key = Self::FreeText { answers };
        key.validate()?;
        Ok(key)
    }

    /// Build a validated multiple-choice key.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::TooFewOptions`, `QuestionError::BlankOption`,
    /// or `QuestionError::CorrectIndexOutOfRange` on invalid input.
    pub fn multiple_choice(
        options: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        let key = Self::MultipleChoice {
            options,
            correct_index,
        };
        key.validate()?;
        Ok(key)
    }

    pub(crate) fn validate(&self) -> Result<(), QuestionError> {
        match self {
            Self::FreeText { answers } => {
                if answers.is_empty() {
                    return Err(QuestionError::NoAcceptedAnswers);
                }
                if answers.iter().any(|a| a.trim().is_empty()) {
                    return Err(QuestionError::BlankAnswer);
                }
            }
            Self::MultipleChoice {
                options,
                correct_index,
            } => {
                if options.len() < 2 {
                    return Err(QuestionError::TooFewOptions);
                }
                if options.iter().any(|o| o.trim().is_empty()) {
                    return Err(QuestionError::BlankOption);
                }
                if *correct_index >= options.len() {
                    return Err(QuestionError::CorrectIndexOutOfRange {
                        index: *correct_index,
                        len: options.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The answer shown to the user after a miss: the first accepted
    /// variant, or the correct option text.
    #[must_use]
    pub fn primary_answer(&self) -> &str {
        match self {
            Self::FreeText { answers } => &answers[0],
            Self::MultipleChoice {
                options,
                correct_index,
            } => &options[*correct_index],
        }
    }

    /// Returns true for multiple-choice keys.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::MultipleChoice { .. })
    }
}

//
// ─── QUESTION ITEM ─────────────────────────────────────────────────────────────
//

/// One quiz question: the prompt shown to the user plus its answer key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionItem {
    prompt: String,
    key: AnswerKey,
}

impl QuestionItem {
    /// Create a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::BlankPrompt` when the prompt is empty after
    /// trimming, or the key's own validation error.
    pub fn new(prompt: impl Into<String>, key: AnswerKey) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::BlankPrompt);
        }
        key.validate()?;
        Ok(Self { prompt, key })
    }

    /// Convenience constructor for a free-text question.
    ///
    /// # Errors
    ///
    /// See [`QuestionItem::new`] and [`AnswerKey::free_text`].
    pub fn free_text(
        prompt: impl Into<String>,
        answers: Vec<String>,
    ) -> Result<Self, QuestionError> {
        Self::new(prompt, AnswerKey::free_text(answers)?)
    }

    /// Convenience constructor for a multiple-choice question.
    ///
    /// # Errors
    ///
    /// See [`QuestionItem::new`] and [`AnswerKey::multiple_choice`].
    pub fn multiple_choice(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        Self::new(prompt, AnswerKey::multiple_choice(options, correct_index)?)
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn key(&self) -> &AnswerKey {
        &self.key
    }
}
