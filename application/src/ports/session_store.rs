//! Session store port
//!
//! The single source of truth for the active session. Every mutation after
//! a model call is tagged with the [`Generation`] read before the call, so a
//! store that has since been reset or reloaded can refuse the stale write.

use parley_domain::{
    Cast, DomainError, Generation, Message, MessageId, NewMessage, ProviderSettings, SessionEvent,
    SessionState, SessionStatus,
};
use thiserror::Error;

/// Errors returned by a [`SessionStore`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Session changed underneath the turn (expected {expected}, now {actual})")]
    StaleGeneration {
        expected: Generation,
        actual: Generation,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl StoreError {
    pub fn is_stale(&self) -> bool {
        matches!(self, StoreError::StaleGeneration { .. })
    }
}

/// Synchronous, shared access to the active session and provider settings.
///
/// Reads return owned snapshots. Writes are serialized by the implementation
/// and apply only when `generation` still matches the held session.
pub trait SessionStore: Send + Sync {
    /// Copy of the current session
    fn snapshot(&self) -> SessionState;

    /// Settings of the active provider
    fn provider(&self) -> ProviderSettings;

    fn set_provider(&self, settings: ProviderSettings);

    /// Increment the turn counter and return the new value
    fn begin_turn(&self, generation: Generation) -> Result<u32, StoreError>;

    fn append_message(
        &self,
        generation: Generation,
        message: NewMessage,
    ) -> Result<Message, StoreError>;

    fn mark_handled(&self, generation: Generation, id: MessageId) -> Result<(), StoreError>;

    /// Drive the lifecycle state machine
    fn apply(&self, generation: Generation, event: SessionEvent)
    -> Result<SessionStatus, StoreError>;

    fn update_cast(&self, generation: Generation, cast: Cast) -> Result<(), StoreError>;

    /// Swap in a different session under a fresh generation and return it
    fn replace(&self, state: SessionState) -> Generation;
}
