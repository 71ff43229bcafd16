//! Console rendering of discussion sessions

use colored::{ColoredString, Colorize};
use parley_application::TurnObserver;
use parley_domain::{ArchivedSession, Message, SessionState, SessionStatus, Speaker, preview};

/// Formats transcript lines, status changes and history listings for a terminal
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    /// One transcript line, labelled and colored by speaker
    pub fn format_message(message: &Message, display_name: &str) -> String {
        match message.speaker() {
            Speaker::Human => format!(
                "  {} {}",
                "(whisper)".dimmed(),
                message.content().italic().dimmed()
            ),
            Speaker::System => format!("{}", message.content().red()),
            speaker => format!(
                "{}\n{}\n",
                Self::speaker_label(speaker, display_name),
                message.content()
            ),
        }
    }

    fn speaker_label(speaker: Speaker, display_name: &str) -> ColoredString {
        let label = format!("── {} ──", display_name);
        match speaker {
            Speaker::Facilitator => label.cyan().bold(),
            Speaker::ExpertA => label.yellow().bold(),
            Speaker::ExpertB => label.magenta().bold(),
            _ => label.normal(),
        }
    }

    pub fn format_status(status: SessionStatus) -> String {
        let text = format!("[{}]", status.as_str());
        match status {
            SessionStatus::Debating => text.green().to_string(),
            SessionStatus::Paused => text.yellow().to_string(),
            SessionStatus::Error => text.red().bold().to_string(),
            SessionStatus::Completed => text.cyan().bold().to_string(),
            SessionStatus::Idle => text.dimmed().to_string(),
        }
    }

    /// Topic, cast and the existing transcript of a session
    pub fn format_session(session: &SessionState) -> String {
        let cast = session.cast();
        let mut output = String::new();

        output.push_str(&Self::header(session.topic()));
        output.push('\n');
        output.push_str(&format!(
            "{} {} {}  {} {} {}  {} {} {}\n",
            "Facilitator:".cyan().bold(),
            cast.facilitator.visual_tag,
            cast.facilitator.name,
            "Expert A:".yellow().bold(),
            cast.expert_a.visual_tag,
            cast.expert_a.name,
            "Expert B:".magenta().bold(),
            cast.expert_b.visual_tag,
            cast.expert_b.name,
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Language:".dimmed(),
            session.language().as_str()
        ));

        if !session.transcript().is_empty() {
            output.push('\n');
            for message in session.transcript() {
                output.push_str(&Self::format_message(
                    message,
                    cast.display_name(message.speaker()),
                ));
                output.push('\n');
            }
        }

        output
    }

    /// Archived sessions, one per line, in the order given
    pub fn format_history(sessions: &[ArchivedSession]) -> String {
        if sessions.is_empty() {
            return format!("{}\n", "No archived sessions.".dimmed());
        }

        let mut output = format!("{}\n", "Archived sessions:".cyan().bold());
        for session in sessions {
            output.push_str(&format!(
                "  {}  {}  {} ({} lines)\n",
                session.id.bold(),
                session
                    .archived_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .dimmed(),
                preview(&session.topic, 60),
                session.utterance_count()
            ));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }
}

/// Prints every transcript line as it is appended
pub struct ConsolePrinter;

impl TurnObserver for ConsolePrinter {
    fn on_message(&self, message: &Message, display_name: &str) {
        println!("{}", ConsoleRenderer::format_message(message, display_name));
    }

    fn on_status_change(&self, status: SessionStatus) {
        println!("{}", ConsoleRenderer::format_status(status));
    }

    fn on_recovery_attempt(&self, speaker: Speaker) {
        println!(
            "{}",
            format!(
                "Context too long for {}; retrying with a shorter history...",
                speaker.as_str()
            )
            .dimmed()
        );
    }

    fn on_turn_discarded(&self, speaker: Speaker) {
        println!(
            "{}",
            format!("Discarded a late reply from {}", speaker.as_str()).dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::{Cast, Language, MessageId, NewMessage};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_agent_message() {
        plain();
        let message = Message::new(MessageId::new(1), Speaker::ExpertA, "Data first.", false);
        let line = ConsoleRenderer::format_message(&message, "The Analyst");
        assert_eq!(line, "── The Analyst ──\nData first.\n");
    }

    #[test]
    fn test_format_whisper_and_notice() {
        plain();
        let whisper = Message::new(MessageId::new(2), Speaker::Human, "push harder", true);
        assert_eq!(
            ConsoleRenderer::format_message(&whisper, "You"),
            "  (whisper) push harder"
        );

        let notice = Message::new(MessageId::new(3), Speaker::System, "System Error: x", false);
        assert_eq!(
            ConsoleRenderer::format_message(&notice, "System"),
            "System Error: x"
        );
    }

    #[test]
    fn test_format_status() {
        plain();
        assert_eq!(
            ConsoleRenderer::format_status(SessionStatus::Paused),
            format!("[{}]", SessionStatus::Paused.as_str())
        );
    }

    #[test]
    fn test_format_session_lists_cast_and_transcript() {
        plain();
        let mut state = SessionState::new("AI and art", Language::Japanese, Cast::default());
        state.append(NewMessage::utterance(Speaker::Facilitator, "Let us begin."));
        let output = ConsoleRenderer::format_session(&state);
        assert!(output.contains("AI and art"));
        assert!(output.contains("The Guide"));
        assert!(output.contains("The Visionary"));
        assert!(output.contains("Language: Japanese"));
        assert!(output.contains("── The Guide ──\nLet us begin."));
    }

    #[test]
    fn test_format_history() {
        plain();
        assert!(ConsoleRenderer::format_history(&[]).contains("No archived sessions."));

        let mut state = SessionState::new("Why do cats purr?", Language::English, Cast::default())
            .with_id("1700000000000");
        state.append(NewMessage::utterance(Speaker::Facilitator, "Welcome."));
        state.append(NewMessage::whisper("go deeper"));
        let listing = ConsoleRenderer::format_history(&[ArchivedSession::capture(&state)]);
        assert!(listing.contains("1700000000000"));
        assert!(listing.contains("Why do cats purr?"));
        assert!(listing.contains("(1 lines)"));
    }
}
