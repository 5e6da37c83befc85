use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use quiz_core::model::{
    AnswerKey, AnswerStyle, CategoryFilter, PracticeMode, QuestionItem, SessionConfig,
    SessionResult,
};

use crate::contract::{
    QuestionProvider, SessionResultRecord, SessionResultStore, StoreError, TransportError,
};

/// Wire shape of a question fetch request.
#[derive(Debug, Serialize)]
struct QuestionRequest<'a> {
    mode: PracticeMode,
    style: AnswerStyle,
    category: Option<&'a str>,
    limit: Option<u32>,
}

/// Wire shape of one question.
#[derive(Debug, Deserialize)]
struct QuestionDto {
    prompt: String,
    #[serde(default)]
    answers: Vec<String>,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    correct_index: Option<usize>,
}

impl QuestionDto {
    fn into_item(self) -> Result<QuestionItem, TransportError> {
        let key = match (self.options, self.correct_index) {
            (Some(options), Some(correct_index)) => {
                AnswerKey::multiple_choice(options, correct_index)
            }
            (None, None) => AnswerKey::free_text(self.answers),
            _ => {
                return Err(TransportError::Decode(
                    "options and correct_index must come together".into(),
                ));
            }
        }
        .map_err(|e| TransportError::Decode(e.to_string()))?;
        QuestionItem::new(self.prompt, key).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Question provider backed by a remote quiz service.
#[derive(Clone)]
pub struct HttpQuestionProvider {
    client: Client,
    base_url: String,
}

impl HttpQuestionProvider {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl QuestionProvider for HttpQuestionProvider {
    async fn fetch_questions(
        &self,
        config: &SessionConfig,
    ) -> Result<Vec<QuestionItem>, TransportError> {
        let category = match config.category() {
            CategoryFilter::All => None,
            CategoryFilter::Named(name) => Some(name.as_str()),
        };
        let payload = QuestionRequest {
            mode: config.mode(),
            style: config.style(),
            category,
            limit: config.limit().count(),
        };

        let response = self
            .client
            .post(self.endpoint("questions"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let dtos: Vec<QuestionDto> = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        dtos.into_iter().map(QuestionDto::into_item).collect()
    }
}

/// Result store backed by a remote quiz service.
#[derive(Clone)]
pub struct HttpResultStore {
    client: Client,
    base_url: String,
}

impl HttpResultStore {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SessionResultStore for HttpResultStore {
    async fn append_result(&self, result: &SessionResult) -> Result<(), StoreError> {
        let record = SessionResultRecord::from_result(result);
        self.client
            .post(self.endpoint("results"))
            .json(&record)
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .error_for_status()
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(())
    }
}
