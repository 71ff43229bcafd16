//! Transcript message entity

use crate::core::error::DomainError;
use crate::discussion::speaker::Speaker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Monotonic position of a message in its transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A line in the discussion transcript (Entity)
///
/// Append-only: after creation only `is_handled` may change, and only once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    id: MessageId,
    speaker: Speaker,
    content: String,
    created_at: DateTime<Utc>,
    is_private: bool,
    #[serde(default)]
    is_handled: bool,
}

impl Message {
    pub fn new(id: MessageId, speaker: Speaker, content: impl Into<String>, is_private: bool) -> Self {
        Self {
            id,
            speaker,
            content: content.into(),
            created_at: Utc::now(),
            is_private,
            is_handled: false,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    pub fn is_handled(&self) -> bool {
        self.is_handled
    }

    /// A human interjection the facilitator has not acted on yet
    pub fn is_pending_whisper(&self) -> bool {
        self.speaker == Speaker::Human && self.is_private && !self.is_handled
    }

    /// Flip `is_handled` exactly once.
    pub(crate) fn mark_handled(&mut self) -> Result<(), DomainError> {
        if self.speaker != Speaker::Human || !self.is_private {
            return Err(DomainError::NotAWhisper(self.id));
        }
        if self.is_handled {
            return Err(DomainError::AlreadyHandled(self.id));
        }
        self.is_handled = true;
        Ok(())
    }
}

/// A message waiting to be appended; the session assigns id and timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub speaker: Speaker,
    pub content: String,
    pub is_private: bool,
}

impl NewMessage {
    /// Public utterance by an agent
    pub fn utterance(speaker: Speaker, content: impl Into<String>) -> Self {
        Self {
            speaker,
            content: content.into(),
            is_private: false,
        }
    }

    /// Private steering note from the human observer
    pub fn whisper(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Human,
            content: content.into(),
            is_private: true,
        }
    }

    /// Visible engine notice (errors, configuration problems)
    pub fn notice(content: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::System,
            content: content.into(),
            is_private: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_is_pending_until_handled() {
        let mut msg = Message::new(MessageId::new(1), Speaker::Human, "ask about costs", true);
        assert!(msg.is_pending_whisper());

        msg.mark_handled().unwrap();
        assert!(msg.is_handled());
        assert!(!msg.is_pending_whisper());
    }

    #[test]
    fn test_mark_handled_only_once() {
        let mut msg = Message::new(MessageId::new(1), Speaker::Human, "hint", true);
        msg.mark_handled().unwrap();
        assert_eq!(
            msg.mark_handled(),
            Err(DomainError::AlreadyHandled(MessageId::new(1)))
        );
    }

    #[test]
    fn test_public_messages_cannot_be_handled() {
        let mut msg = Message::new(MessageId::new(2), Speaker::ExpertA, "claim", false);
        assert_eq!(
            msg.mark_handled(),
            Err(DomainError::NotAWhisper(MessageId::new(2)))
        );
        assert!(!msg.is_pending_whisper());
    }

    #[test]
    fn test_new_message_constructors() {
        assert!(NewMessage::whisper("x").is_private);
        assert_eq!(NewMessage::whisper("x").speaker, Speaker::Human);
        assert!(!NewMessage::notice("x").is_private);
        assert_eq!(NewMessage::notice("x").speaker, Speaker::System);
        assert_eq!(
            NewMessage::utterance(Speaker::ExpertB, "y").speaker,
            Speaker::ExpertB
        );
    }

    #[test]
    fn test_message_id_ordering() {
        let id = MessageId::new(7);
        assert_eq!(id.next(), MessageId::new(8));
        assert!(id < id.next());
        assert_eq!(id.to_string(), "#7");
    }
}
