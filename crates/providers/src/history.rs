use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;

use quiz_core::model::SessionResult;

use crate::contract::{SessionResultRecord, SessionResultStore, StoreError};

/// Session history kept as one JSON array in a file.
///
/// Append reads the file, pushes the new record, and rewrites it. A missing
/// file counts as an empty history.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// All persisted results, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the file cannot be read or parsed.
    pub async fn list(&self) -> Result<Vec<SessionResultRecord>, StoreError> {
        self.read_records().await
    }

    /// Persisted results for one username, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` when the file cannot be read or parsed.
    pub async fn list_for_user(
        &self,
        username: &str,
    ) -> Result<Vec<SessionResultRecord>, StoreError> {
        let records = self.read_records().await?;
        Ok(records
            .into_iter()
            .filter(|r| r.username == username)
            .collect())
    }

    async fn read_records(&self) -> Result<Vec<SessionResultRecord>, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(Vec::new()),
            Ok(text) => {
                serde_json::from_str(&text).map_err(|e| StoreError::Serialization(e.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::Connection(e.to_string())),
        }
    }
}

#[async_trait]
impl SessionResultStore for JsonHistoryStore {
    async fn append_result(&self, result: &SessionResult) -> Result<(), StoreError> {
        let mut records = self.read_records().await?;
        records.push(SessionResultRecord::from_result(result));
        let text = serde_json::to_string_pretty(&records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&self.path, text)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))
    }
}
