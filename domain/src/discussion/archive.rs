//! Immutable snapshot of a finished (or abandoned) session

use crate::discussion::language::Language;
use crate::discussion::message::Message;
use crate::discussion::persona::Cast;
use crate::discussion::session::SessionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Archived copy of a session, keyed by the session id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedSession {
    pub id: String,
    pub topic: String,
    pub archived_at: DateTime<Utc>,
    pub language: Language,
    pub cast: Cast,
    pub transcript: Vec<Message>,
}

impl ArchivedSession {
    /// Snapshot the current state of a session
    pub fn capture(state: &SessionState) -> Self {
        Self {
            id: state.id().to_string(),
            topic: state.topic().to_string(),
            archived_at: Utc::now(),
            language: state.language(),
            cast: state.cast().clone(),
            transcript: state.transcript().to_vec(),
        }
    }

    /// Number of public lines (whispers and notices excluded)
    pub fn utterance_count(&self) -> usize {
        self.transcript
            .iter()
            .filter(|m| m.speaker().is_agent())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::message::NewMessage;
    use crate::discussion::speaker::Speaker;

    #[test]
    fn test_capture_copies_transcript_and_cast() {
        let mut state = SessionState::new("Free will", Language::Japanese, Cast::default());
        state.append(NewMessage::utterance(Speaker::Facilitator, "Welcome"));
        state.append(NewMessage::whisper("ask about neuroscience"));
        state.append(NewMessage::notice("System Error: timeout"));

        let archived = ArchivedSession::capture(&state);
        assert_eq!(archived.id, state.id());
        assert_eq!(archived.topic, "Free will");
        assert_eq!(archived.language, Language::Japanese);
        assert_eq!(archived.transcript.len(), 3);
        assert_eq!(archived.utterance_count(), 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut state = SessionState::new("Cities", Language::Spanish, Cast::default());
        state.append(NewMessage::utterance(Speaker::ExpertA, "Density matters."));
        let archived = ArchivedSession::capture(&state);

        let json = serde_json::to_string(&archived).unwrap();
        let restored: ArchivedSession = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, archived);
    }
}
