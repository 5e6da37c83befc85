#![forbid(unsafe_code)]

pub mod contract;
pub mod dictionary;
pub mod history;
pub mod http;

pub use contract::{
    InMemoryProvider, InMemoryResultStore, QuestionProvider, SessionResultRecord,
    SessionResultStore, StoreError, TransportError,
};
pub use dictionary::{DictionaryError, DictionaryProvider, VerbDictionary};
pub use history::JsonHistoryStore;
pub use http::{HttpQuestionProvider, HttpResultStore};
