//! Persona configuration from TOML (`[personas]` section)

use super::ConfigValidationError;
use parley_domain::{ExpertChoice, Persona, PresetExpert};
use serde::{Deserialize, Serialize};

/// A fully custom persona
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePersona {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub visual_tag: String,
}

impl From<&FilePersona> for Persona {
    fn from(p: &FilePersona) -> Self {
        Persona::new(p.name.clone(), p.description.clone(), p.visual_tag.clone())
    }
}

/// # Example
///
/// ```toml
/// [personas]
/// expert_a = "skeptic"   # preset id, or "auto"
/// expert_b = "auto"
///
/// [personas.facilitator]
/// name = "The Host"
/// description = "Keeps the conversation honest."
/// visual_tag = "🎙️"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePersonasConfig {
    /// Replaces The Guide when set.
    pub facilitator: Option<FilePersona>,
    pub expert_a: String,
    pub expert_b: String,
}

impl Default for FilePersonasConfig {
    fn default() -> Self {
        Self {
            facilitator: None,
            expert_a: "auto".to_string(),
            expert_b: "auto".to_string(),
        }
    }
}

impl FilePersonasConfig {
    pub fn facilitator(&self) -> Persona {
        self.facilitator
            .as_ref()
            .map(Persona::from)
            .unwrap_or_else(Persona::default_facilitator)
    }

    /// Expert choices; unknown preset ids fall back to `auto`.
    pub fn parse_choices(&self) -> ((ExpertChoice, ExpertChoice), Vec<ConfigValidationError>) {
        let mut issues = Vec::new();
        let mut parse = |slot: &'static str, raw: &str| {
            let choice: ExpertChoice = raw.parse().unwrap_or_default();
            match &choice {
                ExpertChoice::Preset(id) if PresetExpert::find(id).is_none() => {
                    issues.push(ConfigValidationError::UnknownExpert {
                        slot,
                        id: raw.to_string(),
                    });
                    ExpertChoice::Auto
                }
                _ => choice,
            }
        };
        let choices = (parse("expert_a", &self.expert_a), parse("expert_b", &self.expert_b));
        (choices, issues)
    }
}
