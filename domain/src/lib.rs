//! Domain layer for panda-parley
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Discussion
//!
//! A facilitator and two experts take turns in strict round robin
//! (facilitator → expert A → expert B → facilitator). A human observer may
//! *whisper* private steering notes that only the facilitator acts on.
//!
//! ## Context window
//!
//! Each request carries the newest part of the transcript that fits an
//! estimated-token budget; private messages are never formatted into it.
//!
//! ## Conclusion
//!
//! The facilitator ends the session by emitting the conclusion marker, or
//! the human asks for a closing summary.

pub mod casting;
pub mod context;
pub mod core;
pub mod discussion;
pub mod prompt;
pub mod providers;

// Re-export commonly used types
pub use casting::{CastingDecision, ExpertChoice, parse_casting_response};
pub use context::{ContextBudget, estimate_tokens, estimated_size, format_transcript, trim};
pub use core::{error::DomainError, string::preview};
pub use discussion::{
    archive::ArchivedSession,
    conclusion::{CONCLUSION_MARKER, Conclusion, detect_conclusion},
    language::Language,
    message::{Message, MessageId, NewMessage},
    persona::{Cast, Persona, PresetExpert},
    session::{Generation, SessionEvent, SessionState, SessionStatus},
    speaker::Speaker,
    whisper::{find_pending, pending_count},
};
pub use prompt::PromptTemplate;
pub use providers::{ProviderKind, ProviderSettings};
