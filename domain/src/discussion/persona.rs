//! Personas and the cast of a discussion

use crate::discussion::speaker::Speaker;
use serde::{Deserialize, Serialize};

/// Character played by an agent (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub description: String,
    /// Short visual marker shown next to the persona's lines (usually an emoji)
    #[serde(default)]
    pub visual_tag: String,
}

impl Persona {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        visual_tag: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            visual_tag: visual_tag.into(),
        }
    }

    pub fn default_facilitator() -> Self {
        Self::new(
            "The Guide",
            "A wise moderator who guides the group past surface-level answers to deeper understanding.",
            "🐼",
        )
    }
}

/// A preset expert the casting step can choose from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetExpert {
    pub id: &'static str,
    pub persona: Persona,
}

impl PresetExpert {
    fn new(id: &'static str, name: &str, description: &str, visual_tag: &str) -> Self {
        Self {
            id,
            persona: Persona::new(name, description, visual_tag),
        }
    }

    /// The built-in roster of experts
    pub fn roster() -> Vec<PresetExpert> {
        vec![
            Self::new(
                "analyst",
                "The Analyst",
                "Logical, data-driven, and focused on deconstructing arguments to find core truths.",
                "🦄",
            ),
            Self::new(
                "visionary",
                "The Visionary",
                "Intuitive, holistic, and focused on connecting disparate ideas to see the big picture.",
                "🐉",
            ),
            Self::new(
                "skeptic",
                "The Skeptic",
                "Questions every assumption, demands evidence, and plays devil's advocate.",
                "🤔",
            ),
            Self::new(
                "historian",
                "The Historian",
                "Contextualizes the topic by drawing parallels to past events and human history.",
                "📜",
            ),
            Self::new(
                "ethicist",
                "The Ethicist",
                "Evaluates the moral implications, fairness, and human impact of the topic.",
                "⚖️",
            ),
            Self::new(
                "realist",
                "The Realist",
                "Pragmatic, grounded, and focused on practical implementation and constraints.",
                "🛠️",
            ),
            Self::new(
                "futurist",
                "The Futurist",
                "Speculates on long-term consequences, technological trends, and future scenarios.",
                "🚀",
            ),
            Self::new(
                "philosopher",
                "The Philosopher",
                "Examines the fundamental nature of the topic, questioning definitions and existence.",
                "🦉",
            ),
        ]
    }

    /// Look up a preset by id (case-insensitive)
    pub fn find(id: &str) -> Option<PresetExpert> {
        Self::roster()
            .into_iter()
            .find(|p| p.id.eq_ignore_ascii_case(id.trim()))
    }
}

/// The three personas taking part in a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cast {
    pub facilitator: Persona,
    pub expert_a: Persona,
    pub expert_b: Persona,
}

impl Cast {
    pub fn new(facilitator: Persona, expert_a: Persona, expert_b: Persona) -> Self {
        Self {
            facilitator,
            expert_a,
            expert_b,
        }
    }

    /// Persona voicing `speaker`, if the speaker is an agent
    pub fn persona_for(&self, speaker: Speaker) -> Option<&Persona> {
        match speaker {
            Speaker::Facilitator => Some(&self.facilitator),
            Speaker::ExpertA => Some(&self.expert_a),
            Speaker::ExpertB => Some(&self.expert_b),
            Speaker::Human | Speaker::System => None,
        }
    }

    /// Name to display for a speaker's lines
    pub fn display_name(&self, speaker: Speaker) -> &str {
        match self.persona_for(speaker) {
            Some(persona) => &persona.name,
            None if speaker == Speaker::Human => "You",
            None => "System",
        }
    }
}

impl Default for Cast {
    /// The Guide moderating The Analyst and The Visionary.
    fn default() -> Self {
        let roster = PresetExpert::roster();
        Self {
            facilitator: Persona::default_facilitator(),
            expert_a: roster[0].persona.clone(),
            expert_b: roster[1].persona.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_has_unique_ids() {
        let roster = PresetExpert::roster();
        assert_eq!(roster.len(), 8);
        let mut ids: Vec<_> = roster.iter().map(|p| p.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let preset = PresetExpert::find("Ethicist").unwrap();
        assert_eq!(preset.persona.name, "The Ethicist");
        assert!(PresetExpert::find("astronaut").is_none());
    }

    #[test]
    fn test_default_cast() {
        let cast = Cast::default();
        assert_eq!(cast.facilitator.name, "The Guide");
        assert_eq!(cast.expert_a.name, "The Analyst");
        assert_eq!(cast.expert_b.name, "The Visionary");
    }

    #[test]
    fn test_display_names() {
        let cast = Cast::default();
        assert_eq!(cast.display_name(Speaker::ExpertB), "The Visionary");
        assert_eq!(cast.display_name(Speaker::Human), "You");
        assert_eq!(cast.display_name(Speaker::System), "System");
        assert!(cast.persona_for(Speaker::Human).is_none());
    }
}
