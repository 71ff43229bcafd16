//! Session state and its lifecycle state machine

use crate::core::error::DomainError;
use crate::discussion::archive::ArchivedSession;
use crate::discussion::language::Language;
use crate::discussion::message::{Message, MessageId, NewMessage};
use crate::discussion::persona::Cast;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Debating,
    Paused,
    Error,
    Completed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Debating => "debating",
            SessionStatus::Paused => "paused",
            SessionStatus::Error => "error",
            SessionStatus::Completed => "completed",
        }
    }

    /// `error` and `completed` never advance on their own
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Error | SessionStatus::Completed)
    }

    /// Transition function of the lifecycle state machine.
    ///
    /// Returns `None` when `event` is not accepted in the current status.
    pub fn on(self, event: SessionEvent) -> Option<SessionStatus> {
        use SessionEvent as E;
        use SessionStatus as S;

        match (self, event) {
            (S::Idle, E::Start) => Some(S::Debating),
            (S::Debating, E::Pause) => Some(S::Paused),
            (S::Paused | S::Error, E::Resume) => Some(S::Debating),
            (S::Debating | S::Paused, E::WhisperSubmitted) => Some(S::Debating),
            (S::Debating | S::Paused | S::Error, E::EndRequested) => Some(S::Debating),
            (S::Debating | S::Paused, E::Concluded) => Some(S::Completed),
            (_, E::Failed) => Some(S::Error),
            (_, E::StartOver) => Some(S::Idle),
            _ => None,
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inputs that drive the lifecycle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    /// Begin the discussion (resets the turn counter)
    Start,
    Pause,
    /// Continue after a pause, or retry after an error
    Resume,
    /// A private human message was appended
    WhisperSubmitted,
    /// The human asked the facilitator to wrap up
    EndRequested,
    /// A closing turn finished or the facilitator emitted the conclusion marker
    Concluded,
    /// A turn failed without recovery
    Failed,
    StartOver,
}

/// Epoch of a session held by a store.
///
/// Bumped whenever the store swaps in a different session (reset, load),
/// so a response computed for an older session can be recognized and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// State of one discussion session (Entity)
#[derive(Debug, Clone)]
pub struct SessionState {
    id: String,
    generation: Generation,
    status: SessionStatus,
    turn_count: u32,
    topic: String,
    language: Language,
    cast: Cast,
    transcript: Vec<Message>,
    next_id: MessageId,
}

impl SessionState {
    /// Create a fresh `idle` session
    pub fn new(topic: impl Into<String>, language: Language, cast: Cast) -> Self {
        Self {
            id: Utc::now().timestamp_millis().to_string(),
            generation: Generation::default(),
            status: SessionStatus::Idle,
            turn_count: 0,
            topic: topic.into(),
            language,
            cast,
            transcript: Vec::new(),
            next_id: MessageId::new(1),
        }
    }

    /// Reopen an archived session. It comes back `paused` under its old id,
    /// so archiving it again overwrites the same entry.
    pub fn from_archive(archived: &ArchivedSession) -> Self {
        let next_id = archived
            .transcript
            .iter()
            .map(|m| m.id())
            .max()
            .map(|id| id.next())
            .unwrap_or(MessageId::new(1));

        Self {
            id: archived.id.clone(),
            generation: Generation::default(),
            status: SessionStatus::Paused,
            turn_count: 0,
            topic: archived.topic.clone(),
            language: archived.language,
            cast: archived.cast.clone(),
            transcript: archived.transcript.clone(),
            next_id,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn cast(&self) -> &Cast {
        &self.cast
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    // ==================== Mutations ====================

    /// Drive the state machine; `Start` also resets the turn counter.
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionStatus, DomainError> {
        let next = self
            .status
            .on(event)
            .ok_or(DomainError::InvalidTransition {
                status: self.status,
                event,
            })?;

        if event == SessionEvent::Start {
            self.turn_count = 0;
        }
        self.status = next;
        Ok(next)
    }

    /// Count a turn attempt and return the new count
    pub fn begin_turn(&mut self) -> u32 {
        self.turn_count += 1;
        self.turn_count
    }

    /// Append a message at the end of the transcript
    pub fn append(&mut self, message: NewMessage) -> Message {
        let appended = Message::new(
            self.next_id,
            message.speaker,
            message.content,
            message.is_private,
        );
        self.next_id = self.next_id.next();
        self.transcript.push(appended.clone());
        appended
    }

    /// Mark a whisper as acted upon
    pub fn mark_handled(&mut self, id: MessageId) -> Result<(), DomainError> {
        self.transcript
            .iter_mut()
            .find(|m| m.id() == id)
            .ok_or(DomainError::MessageNotFound(id))?
            .mark_handled()
    }

    /// Replace the cast between turns
    pub fn set_cast(&mut self, cast: Cast) {
        self.cast = cast;
    }
}
