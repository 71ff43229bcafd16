//! Speaker value object and the turn-taking transition function

use crate::discussion::message::Message;
use serde::{Deserialize, Serialize};

/// Who authored a message in the discussion (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// Moderator who guides the discussion and reads whispers
    Facilitator,
    /// First expert
    ExpertA,
    /// Second expert
    ExpertB,
    /// The human observer (whispers)
    Human,
    /// Engine notices such as configuration or transport errors
    System,
}

impl Speaker {
    pub fn as_str(&self) -> &str {
        match self {
            Speaker::Facilitator => "facilitator",
            Speaker::ExpertA => "expert_a",
            Speaker::ExpertB => "expert_b",
            Speaker::Human => "human",
            Speaker::System => "system",
        }
    }

    /// Label used for this speaker in the model-visible transcript
    pub fn transcript_label(&self) -> &str {
        match self {
            Speaker::Facilitator => "FACILITATOR",
            Speaker::ExpertA => "EXPERT A",
            Speaker::ExpertB => "EXPERT B",
            Speaker::Human => "HUMAN",
            Speaker::System => "SYSTEM",
        }
    }

    /// Whether this speaker's lines are produced by a model call
    pub fn is_agent(&self) -> bool {
        matches!(
            self,
            Speaker::Facilitator | Speaker::ExpertA | Speaker::ExpertB
        )
    }

    /// Total round-robin transition: who speaks after `self`.
    ///
    /// Anything that is not an agent hands the floor to the facilitator,
    /// since only the facilitator may react to human interjections.
    pub fn successor(&self) -> Speaker {
        match self {
            Speaker::Facilitator => Speaker::ExpertA,
            Speaker::ExpertA => Speaker::ExpertB,
            Speaker::ExpertB => Speaker::Facilitator,
            Speaker::Human | Speaker::System => Speaker::Facilitator,
        }
    }

    /// Pick the next speaker from a transcript.
    ///
    /// Keyed off the last message that is not an engine notice; an empty
    /// transcript starts with the facilitator.
    pub fn next_turn(transcript: &[Message]) -> Speaker {
        transcript
            .iter()
            .rev()
            .find(|m| m.speaker() != Speaker::System)
            .map(|m| m.speaker().successor())
            .unwrap_or(Speaker::Facilitator)
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
