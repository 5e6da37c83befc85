//! Shared error types for the services crate.

use thiserror::Error;

use providers::TransportError;
use quiz_core::model::SessionResultError;

/// Errors emitted by the practice session engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The provider had nothing for the requested filter. Not a fault:
    /// the user should change the configuration rather than retry.
    #[error("no questions available for this selection")]
    Empty,

    /// The provider could not be reached; retrying the start may succeed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Operation on a session that already finished.
    #[error("session already finalized")]
    Completed,

    #[error("current question expects a multiple-choice selection")]
    ExpectsChoice,

    #[error("current question expects a typed answer")]
    ExpectsText,

    #[error(transparent)]
    Result(#[from] SessionResultError),
}
