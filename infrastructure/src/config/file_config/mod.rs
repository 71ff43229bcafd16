//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Conversions into domain and application types fall back to defaults and
//! report what they could not use.

mod archive;
mod discussion;
mod logging;
mod personas;
mod provider;

pub use archive::FileArchiveConfig;
pub use discussion::FileDiscussionConfig;
pub use logging::FileLoggingConfig;
pub use personas::{FilePersona, FilePersonasConfig};
pub use provider::{FileProviderConfig, FileProviderEntry};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors.
///
/// None of these stop the program; the affected value falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("provider.kind: unknown provider '{0}', falling back to 'gemini'")]
    UnknownProvider(String),

    #[error("discussion.language: unknown language '{0}', falling back to 'english'")]
    UnknownLanguage(String),

    #[error("{0}")]
    InvalidDiscussion(String),

    #[error("discussion.request_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("personas.{slot}: unknown expert '{id}', falling back to 'auto'")]
    UnknownExpert { slot: &'static str, id: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Active model provider and per-provider credentials
    pub provider: FileProviderConfig,
    /// Language, pacing and context budgets
    pub discussion: FileDiscussionConfig,
    /// Facilitator override and expert choices
    pub personas: FilePersonasConfig,
    /// Session history location
    pub archive: FileArchiveConfig,
    /// Log file locations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();
        issues.extend(self.provider.parse_kind().1);
        issues.extend(self.discussion.parse_language().1);
        issues.extend(self.discussion.to_params().1);
        issues.extend(self.personas.parse_choices().1);
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::{ExpertChoice, Language, ProviderKind};

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[provider]
kind = "openrouter"

[provider.openrouter]
api_key_env = "MY_ROUTER_KEY"
model = "meta-llama/llama-3-8b-instruct"

[provider.openai]
base_url = "http://localhost:1234/v1"

[discussion]
language = "japanese"
autoplay_interval_ms = 3500
context_budget = 3000
recovery_budget = 800

[personas]
expert_a = "historian"
expert_b = "auto"

[personas.facilitator]
name = "The Host"
description = "Keeps things moving."
visual_tag = "🎙️"

[archive]
dir = "/tmp/parley-sessions"

[logging]
conversation_log = "/tmp/parley.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.provider.parse_kind().0, ProviderKind::OpenRouter);
        assert_eq!(
            config.provider.openrouter.api_key_env.as_deref(),
            Some("MY_ROUTER_KEY")
        );
        assert_eq!(config.discussion.parse_language().0, Language::Japanese);
        assert_eq!(config.discussion.autoplay_interval_ms, 3500);
        assert_eq!(
            config.personas.parse_choices().0,
            (ExpertChoice::Preset("historian".to_string()), ExpertChoice::Auto)
        );
        assert_eq!(config.personas.facilitator.as_ref().unwrap().name, "The Host");
        assert!(config.logging.conversation_log.is_some());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.provider.kind, "gemini");
        assert_eq!(config.discussion.context_budget, 2500);
        assert!(config.archive.enabled);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let toml_str = r#"
[provider]
kind = "bedrock"

[discussion]
language = "klingon"
recovery_budget = 0
request_timeout_seconds = 0

[personas]
expert_b = "astrologer"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();

        assert!(issues.contains(&ConfigValidationError::UnknownProvider("bedrock".to_string())));
        assert!(issues.contains(&ConfigValidationError::UnknownLanguage("klingon".to_string())));
        assert!(issues.contains(&ConfigValidationError::InvalidTimeout));
        assert!(issues.contains(&ConfigValidationError::UnknownExpert {
            slot: "expert_b",
            id: "astrologer".to_string(),
        }));
        assert!(issues.iter().any(|i| i.to_string().starts_with("recovery_budget")));
    }
}
