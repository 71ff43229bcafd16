//! Expert casting: choosing the two experts for a topic.
//!
//! Each expert slot is either fixed by the user or left to the model. The
//! model answers with a small JSON object which is parsed leniently: the
//! first `{` through the last `}` of the reply is decoded.

use crate::discussion::persona::PresetExpert;
use serde::Deserialize;

/// How one expert slot is filled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExpertChoice {
    /// Let the model pick from the roster
    #[default]
    Auto,
    /// A preset id from [`PresetExpert::roster`]
    Preset(String),
}

impl ExpertChoice {
    pub fn is_auto(&self) -> bool {
        matches!(self, ExpertChoice::Auto)
    }
}

impl std::str::FromStr for ExpertChoice {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("auto") {
            Ok(ExpertChoice::Auto)
        } else {
            Ok(ExpertChoice::Preset(s.to_lowercase()))
        }
    }
}

/// The model's casting answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CastingDecision {
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default, rename = "expertAId")]
    pub expert_a_id: Option<String>,
    #[serde(default, rename = "expertBId")]
    pub expert_b_id: Option<String>,
}

impl CastingDecision {
    pub fn expert_a(&self) -> Option<PresetExpert> {
        self.expert_a_id.as_deref().and_then(PresetExpert::find)
    }

    pub fn expert_b(&self) -> Option<PresetExpert> {
        self.expert_b_id.as_deref().and_then(PresetExpert::find)
    }
}

/// Extract the casting JSON object from a free-form model reply.
///
/// Returns `None` when no braces are present or the object does not decode.
pub fn parse_casting_response(response: &str) -> Option<CastingDecision> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&response[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_json() {
        let decision = parse_casting_response(
            r#"{ "reasoning": "contrast", "expertAId": "ethicist", "expertBId": "futurist" }"#,
        )
        .unwrap();
        assert_eq!(decision.reasoning.as_deref(), Some("contrast"));
        assert_eq!(decision.expert_a().unwrap().persona.name, "The Ethicist");
        assert_eq!(decision.expert_b().unwrap().persona.name, "The Futurist");
    }

    #[test]
    fn test_parse_json_inside_prose_and_fences() {
        let reply = "Sure! Here is my pick:\n```json\n{\"expertAId\": \"skeptic\", \"expertBId\": \"historian\"}\n```\nEnjoy.";
        let decision = parse_casting_response(reply).unwrap();
        assert_eq!(decision.expert_a_id.as_deref(), Some("skeptic"));
        assert_eq!(decision.expert_b_id.as_deref(), Some("historian"));
        assert!(decision.reasoning.is_none());
    }

    #[test]
    fn test_parse_failures() {
        assert!(parse_casting_response("no json here").is_none());
        assert!(parse_casting_response("} backwards {").is_none());
        assert!(parse_casting_response("{ not: valid }").is_none());
    }

    #[test]
    fn test_unknown_ids_resolve_to_none() {
        let decision =
            parse_casting_response(r#"{"expertAId": "wizard", "expertBId": "realist"}"#).unwrap();
        assert!(decision.expert_a().is_none());
        assert!(decision.expert_b().is_some());
    }

    #[test]
    fn test_expert_choice_parse() {
        assert_eq!("auto".parse::<ExpertChoice>().unwrap(), ExpertChoice::Auto);
        assert_eq!("".parse::<ExpertChoice>().unwrap(), ExpertChoice::Auto);
        assert_eq!(
            "Skeptic".parse::<ExpertChoice>().unwrap(),
            ExpertChoice::Preset("skeptic".to_string())
        );
    }
}
