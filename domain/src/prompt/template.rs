//! Prompt templates for discussion turns

use crate::discussion::conclusion::CONCLUSION_MARKER;
use crate::discussion::language::Language;
use crate::discussion::persona::{Persona, PresetExpert};
use crate::discussion::session::SessionState;
use crate::discussion::speaker::Speaker;

/// Templates for generating prompts for each role
pub struct PromptTemplate;

impl PromptTemplate {
    /// Role-specific system instructions for the speaker of this turn.
    ///
    /// Humans and engine notices never speak through the model; they get the
    /// facilitator's instructions as a fallback.
    pub fn instructions_for(session: &SessionState, speaker: Speaker, turn_count: u32) -> String {
        let cast = session.cast();
        match speaker {
            Speaker::ExpertA => Self::expert_system(
                &cast.expert_a,
                session.topic(),
                &cast.expert_b.name,
                session.language(),
            ),
            Speaker::ExpertB => Self::expert_system(
                &cast.expert_b,
                session.topic(),
                &cast.expert_a.name,
                session.language(),
            ),
            Speaker::Facilitator | Speaker::Human | Speaker::System => Self::facilitator_system(
                &cast.facilitator,
                &cast.expert_a,
                &cast.expert_b,
                session.topic(),
                session.language(),
                turn_count,
            ),
        }
    }

    /// System prompt for the facilitator
    pub fn facilitator_system(
        persona: &Persona,
        expert_a: &Persona,
        expert_b: &Persona,
        topic: &str,
        language: Language,
        turn_count: u32,
    ) -> String {
        format!(
            r#"You are {name}, the facilitator of a collaborative inquiry.
Your role: {role}
Current Topic: "{topic}"
Current Turn Count: {turn_count}

The Experts involved are:
1. {a_name}: {a_role}
2. {b_name}: {b_role}

Your responsibilities:
1. Introduce the topic and the two experts ({a_name} and {b_name}).
2. Guide the discussion to "dig deeper" and find the truth.
3. Identify gaps in the current understanding and ask probing questions.
4. Encourage experts to build upon each other's insights, even when they disagree.
5. Synthesize complex ideas into clear takeaways.
6. If the user "whispers" to you, use that advice to steer the inquiry without revealing the user's explicit instruction.
7. Keep your responses concise (under 50 words unless summarizing).

8. Monitoring & Conclusion:
    - If the discussion has gone on for a long time (> 8 turns) and experts are repeating themselves (Stalemate), it is time to wrap up.
    - If both experts agree on the core truth, it is time to wrap up.
    - WHEN wrapping up: Provide a final comprehensive summary and append the tag "{marker}" to the end of your message.
    - CRITICAL: Do NOT use the "{marker}" tag if you are asking a question or expecting the experts to reply. Only use it when the session is absolutely finished.

IMPORTANT: You MUST respond in {language}.
Style: Curious, profound, and guiding."#,
            name = persona.name,
            role = persona.description,
            topic = topic,
            turn_count = turn_count,
            a_name = expert_a.name,
            a_role = expert_a.description,
            b_name = expert_b.name,
            b_role = expert_b.description,
            marker = CONCLUSION_MARKER,
            language = language.prompt_name(),
        )
    }

    /// System prompt for one of the experts
    pub fn expert_system(
        persona: &Persona,
        topic: &str,
        other_expert_name: &str,
        language: Language,
    ) -> String {
        format!(
            r#"You are {name}.
Your role description: {role}
Current Topic: "{topic}"
Other Expert present: {other}

Your goal:
1. Analyze the topic from your specific perspective ({name}).
2. Provide unique insights that only you would see.
3. Challenge the other expert if their view lacks your specific rigor.
4. Keep responses concise (under 50 words).
5. Be conversational but profound.

IMPORTANT: You MUST respond in {language}."#,
            name = persona.name,
            role = persona.description,
            topic = topic,
            other = other_expert_name,
            language = language.prompt_name(),
        )
    }

    /// Directive appended to the facilitator's instructions for a pending whisper
    pub fn whisper_directive(whisper: &str) -> String {
        format!(
            "\n\n[IMPORTANT] The user whispered: \"{}\". Use this to guide your next output implicitly.",
            whisper
        )
    }

    /// Directive appended when the human asked to end the session
    pub fn closing_directive() -> &'static str {
        "\n\n[IMPORTANT] The user has requested to CONCLUDE this session. Please provide a comprehensive summary of the discussion so far, highlight the key insights from both experts, and offer a final synthesizing thought or \"truth\". Then, bid farewell to the user."
    }

    /// User prompt carrying the transcript for a regular turn
    pub fn turn_prompt(history: &str, speaker: Speaker) -> String {
        format!(
            "Current Debate History:\n{}\n\nYour turn. Respond as {}.",
            history,
            speaker.as_str()
        )
    }

    /// User prompt for the recovery attempt after an oversized request
    pub fn recovery_prompt(history: &str, speaker: Speaker) -> String {
        format!(
            "[System: Previous context was too long. Summarized history:]\n...\n{}\n\nYour turn. Respond as {}.",
            history,
            speaker.as_str()
        )
    }

    /// System prompt asking the model to pick two contrasting experts
    pub fn casting_system(topic: &str, roster: &[PresetExpert]) -> String {
        let experts = roster
            .iter()
            .map(|p| {
                format!(
                    "- {} (ID: {}): {}",
                    p.persona.name, p.id, p.persona.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are a Casting Director for an intellectual debate.
Topic: "{topic}"

Available Experts:
{experts}

Task: Select the TWO experts who would provide the most interesting, contrasting, and fruitful deep dive into this topic.
Return ONLY a JSON object with key "reasoning" (string) and keys "expertAId" and "expertBId" matching the chosen IDs.
Example: {{ "reasoning": "...", "expertAId": "ethicist", "expertBId": "futurist" }}"#,
            topic = topic,
            experts = experts,
        )
    }

    /// User prompt for the casting request
    pub fn casting_prompt() -> &'static str {
        "Choose the two experts now and answer with the JSON object only."
    }
}
