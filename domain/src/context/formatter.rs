//! Transcript formatting for model requests

use crate::discussion::message::Message;
use crate::discussion::speaker::Speaker;

/// Serialize messages into the flat text block sent to the model.
///
/// Private messages and engine notices never reach the model as raw text;
/// whispers are surfaced separately through the facilitator's instructions.
pub fn format_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .filter(|m| !m.is_private() && m.speaker() != Speaker::System)
        .map(|m| format!("{}: {}", m.speaker().transcript_label(), m.content()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discussion::language::Language;
    use crate::discussion::message::NewMessage;
    use crate::discussion::persona::Cast;
    use crate::discussion::session::SessionState;

    #[test]
    fn test_format_labels_and_separators() {
        let mut s = SessionState::new("t", Language::English, Cast::default());
        s.append(NewMessage::utterance(Speaker::Facilitator, "Welcome."));
        s.append(NewMessage::utterance(Speaker::ExpertA, "Numbers first."));

        assert_eq!(
            format_transcript(s.transcript()),
            "FACILITATOR: Welcome.\n\nEXPERT A: Numbers first."
        );
    }

    #[test]
    fn test_private_content_never_formatted() {
        let mut s = SessionState::new("t", Language::English, Cast::default());
        s.append(NewMessage::utterance(Speaker::Facilitator, "Welcome."));
        s.append(NewMessage::whisper("SECRET-STEER"));
        s.append(NewMessage::notice("System Error: boom"));
        s.append(NewMessage::utterance(Speaker::ExpertB, "Look wider."));

        let text = format_transcript(s.transcript());
        assert!(!text.contains("SECRET-STEER"));
        assert!(!text.contains("boom"));
        assert!(text.contains("EXPERT B: Look wider."));
    }

    #[test]
    fn test_empty() {
        assert_eq!(format_transcript(&[]), "");
    }
}
