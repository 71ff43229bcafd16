//! Transcript export

use crate::cli::commands::ExportFormat;
use parley_domain::{ArchivedSession, Speaker};

/// Renders archived sessions for saving outside the application
pub struct TranscriptExporter;

impl TranscriptExporter {
    pub fn export(session: &ArchivedSession, format: ExportFormat) -> String {
        match format {
            ExportFormat::Markdown => Self::to_markdown(session),
            ExportFormat::Json => Self::to_json(session),
        }
    }

    /// Markdown document with a participant header and one section per line.
    ///
    /// Whispers become quoted asides; engine notices are left out.
    pub fn to_markdown(session: &ArchivedSession) -> String {
        let cast = &session.cast;
        let mut md = format!("# {}\n\n", session.topic);
        md.push_str(&format!(
            "**Date**: {}\n",
            session.archived_at.format("%Y-%m-%d")
        ));
        md.push_str(&format!("**Language**: {}\n", session.language.as_str()));
        md.push_str("**Participants**:\n");
        md.push_str(&format!("- **{}** (Facilitator)\n", cast.facilitator.name));
        md.push_str(&format!("- **{}** (Expert A)\n", cast.expert_a.name));
        md.push_str(&format!("- **{}** (Expert B)\n\n", cast.expert_b.name));
        md.push_str("---\n\n");

        for message in &session.transcript {
            match message.speaker() {
                Speaker::Human => {
                    md.push_str(&format!("> *[Whisper] {}*\n\n", message.content()));
                }
                Speaker::System => {}
                speaker => {
                    md.push_str(&format!(
                        "### {}\n{}\n\n",
                        cast.display_name(speaker),
                        message.content()
                    ));
                }
            }
        }

        md
    }

    pub fn to_json(session: &ArchivedSession) -> String {
        serde_json::to_string_pretty(session).unwrap_or_else(|_| "{}".to_string())
    }

    /// Suggested file name for an export
    pub fn file_name(session: &ArchivedSession, format: ExportFormat) -> String {
        let extension = match format {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        };
        format!(
            "panda-parley-{}.{}",
            session.archived_at.format("%Y-%m-%d"),
            extension
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::{Cast, Language, NewMessage, SessionState};

    fn archived() -> ArchivedSession {
        let mut state = SessionState::new("Why do cats purr?", Language::Spanish, Cast::default());
        state.append(NewMessage::utterance(Speaker::Facilitator, "Welcome, experts."));
        state.append(NewMessage::whisper("ask about healing"));
        state.append(NewMessage::utterance(Speaker::ExpertA, "Vibration at 25Hz."));
        state.append(NewMessage::notice("System Error: boom. Use \"Start Over\" if stuck."));
        ArchivedSession::capture(&state)
    }

    #[test]
    fn test_markdown_header() {
        let md = TranscriptExporter::to_markdown(&archived());
        assert!(md.starts_with("# Why do cats purr?\n\n"));
        assert!(md.contains("**Language**: Spanish"));
        assert!(md.contains("- **The Guide** (Facilitator)"));
        assert!(md.contains("- **The Analyst** (Expert A)"));
        assert!(md.contains("- **The Visionary** (Expert B)"));
    }

    #[test]
    fn test_markdown_body() {
        let md = TranscriptExporter::to_markdown(&archived());
        assert!(md.contains("### The Guide\nWelcome, experts.\n\n"));
        assert!(md.contains("> *[Whisper] ask about healing*"));
        assert!(md.contains("### The Analyst\nVibration at 25Hz."));
        assert!(!md.contains("System Error"));

        let guide = md.find("### The Guide").unwrap();
        let whisper = md.find("[Whisper]").unwrap();
        let analyst = md.find("### The Analyst").unwrap();
        assert!(guide < whisper && whisper < analyst);
    }

    #[test]
    fn test_json_export_parses_back() {
        let session = archived();
        let json = TranscriptExporter::export(&session, ExportFormat::Json);
        let parsed: ArchivedSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }

    #[test]
    fn test_file_name() {
        let session = archived();
        let name = TranscriptExporter::file_name(&session, ExportFormat::Markdown);
        assert!(name.starts_with("panda-parley-"));
        assert!(name.ends_with(".md"));
    }
}
