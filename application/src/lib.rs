//! Application layer for panda-parley
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::DiscussionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    model_client::{CompletionRequest, ModelClient, ModelError},
    session_archive::{ArchiveError, NoSessionArchive, SessionArchive},
    session_store::{SessionStore, StoreError},
    turn_observer::{NoTurnObserver, TurnObserver},
};
pub use use_cases::auto_play::AutoPlayDriver;
pub use use_cases::cast_experts::{
    CastExpertsInput, CastExpertsUseCase, CastingError, CastingResult,
};
pub use use_cases::orchestrator::{SkipReason, TurnError, TurnOrchestrator, TurnOutcome};
pub use use_cases::recovery::{FailureClass, classify};
