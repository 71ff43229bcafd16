//! Whisper resolution: which human interjection the facilitator reacts to

use crate::discussion::message::Message;

/// Find the most recent whisper the facilitator has not acted on.
///
/// Only one whisper is used per facilitator turn. Older pending whispers stay
/// in place and surface on later turns once the newer ones are handled.
pub fn find_pending(transcript: &[Message]) -> Option<&Message> {
    transcript.iter().rev().find(|m| m.is_pending_whisper())
}

/// Number of whispers still waiting for the facilitator
pub fn pending_count(transcript: &[Message]) -> usize {
    transcript.iter().filter(|m| m.is_pending_whisper()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::language::Language;
    use crate::discussion::message::NewMessage;
    use crate::discussion::persona::Cast;
    use crate::discussion::session::SessionState;
    use crate::discussion::speaker::Speaker;

    fn session() -> SessionState {
        SessionState::new("topic", Language::English, Cast::default())
    }

    #[test]
    fn test_no_whisper() {
        let mut s = session();
        s.append(NewMessage::utterance(Speaker::Facilitator, "Welcome"));
        assert!(find_pending(s.transcript()).is_none());
        assert!(find_pending(&[]).is_none());
    }

    #[test]
    fn test_newest_whisper_wins_then_older_drains() {
        let mut s = session();
        let w1 = s.append(NewMessage::whisper("W1"));
        s.append(NewMessage::utterance(Speaker::ExpertA, "point"));
        let w2 = s.append(NewMessage::whisper("W2"));
        assert_eq!(pending_count(s.transcript()), 2);

        assert_eq!(find_pending(s.transcript()).unwrap().id(), w2.id());
        s.mark_handled(w2.id()).unwrap();

        assert_eq!(find_pending(s.transcript()).unwrap().id(), w1.id());
        s.mark_handled(w1.id()).unwrap();

        assert!(find_pending(s.transcript()).is_none());
    }

    #[test]
    fn test_public_human_lines_are_not_whispers() {
        let mut s = session();
        s.append(NewMessage {
            speaker: Speaker::Human,
            content: "hello everyone".to_string(),
            is_private: false,
        });
        assert!(find_pending(s.transcript()).is_none());
    }
}
