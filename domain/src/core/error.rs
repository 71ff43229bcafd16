//! Domain error types

use crate::discussion::message::MessageId;
use crate::discussion::session::{SessionEvent, SessionStatus};
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Cannot apply {event:?} while session is {status}")]
    InvalidTransition {
        status: SessionStatus,
        event: SessionEvent,
    },

    #[error("Message {0} not found in transcript")]
    MessageNotFound(MessageId),

    #[error("Message {0} was already handled")]
    AlreadyHandled(MessageId),

    #[error("Message {0} is not a pending whisper")]
    NotAWhisper(MessageId),

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
}

impl DomainError {
    /// Check if this error is a rejected state-machine transition
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}
