//! Model provider settings (provider-neutral, wire-format free).
//!
//! Describes *which* backend answers completion requests and with what
//! credentials. Request encoding lives in the infrastructure layer.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Supported completion backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    /// OpenAI or any OpenAI-compatible server (including local ones)
    OpenAi,
    OpenRouter,
    ModelScope,
}

impl ProviderKind {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::ModelScope => "modelscope",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            ProviderKind::Gemini => "Google Gemini",
            ProviderKind::OpenAi => "Local / OpenAI",
            ProviderKind::OpenRouter => "OpenRouter",
            ProviderKind::ModelScope => "ModelScope",
        }
    }

    pub fn default_base_url(&self) -> &str {
        match self {
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
            ProviderKind::ModelScope => "https://api-inference.modelscope.cn/v1",
        }
    }

    pub fn default_model(&self) -> &str {
        match self {
            ProviderKind::Gemini => "gemini-pro",
            ProviderKind::OpenAi => "gpt-3.5-turbo",
            ProviderKind::OpenRouter => "mistralai/mistral-7b-instruct",
            ProviderKind::ModelScope => "qwen-turbo",
        }
    }

    /// Local OpenAI-compatible servers usually run without a key
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderKind::OpenAi)
    }

    /// Whether requests follow the OpenAI chat-completions wire format
    pub fn is_openai_compatible(&self) -> bool {
        !matches!(self, ProviderKind::Gemini)
    }

    pub fn all() -> [ProviderKind; 4] {
        [
            ProviderKind::Gemini,
            ProviderKind::OpenAi,
            ProviderKind::OpenRouter,
            ProviderKind::ModelScope,
        ]
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "openai" | "local" => Ok(ProviderKind::OpenAi),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "modelscope" => Ok(ProviderKind::ModelScope),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// Settings of the active provider, snapshotted at the start of each turn
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    /// Overrides [`ProviderKind::default_base_url`]
    pub base_url: Option<String>,
    /// Overrides [`ProviderKind::default_model`]
    pub model: Option<String>,
}

impl ProviderSettings {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// The API key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// False when the provider needs a key and none is configured
    pub fn has_credentials(&self) -> bool {
        !self.kind.requires_api_key() || self.api_key().is_some()
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(self.kind.default_base_url())
    }

    pub fn effective_model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(self.kind.default_model())
    }
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!("OpenRouter".parse::<ProviderKind>().unwrap(), ProviderKind::OpenRouter);
        assert_eq!("local".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert!("bedrock".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_credentials_required_except_openai() {
        assert!(!ProviderSettings::new(ProviderKind::Gemini).has_credentials());
        assert!(!ProviderSettings::new(ProviderKind::ModelScope).has_credentials());
        assert!(ProviderSettings::new(ProviderKind::OpenAi).has_credentials());
        assert!(
            ProviderSettings::new(ProviderKind::Gemini)
                .with_api_key("AIza-test")
                .has_credentials()
        );
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let settings = ProviderSettings::new(ProviderKind::OpenRouter).with_api_key("   ");
        assert!(settings.api_key().is_none());
        assert!(!settings.has_credentials());
    }

    #[test]
    fn test_effective_defaults_and_overrides() {
        let settings = ProviderSettings::new(ProviderKind::ModelScope);
        assert_eq!(settings.effective_model(), "qwen-turbo");
        assert_eq!(
            settings.effective_base_url(),
            "https://api-inference.modelscope.cn/v1"
        );

        let settings = ProviderSettings::new(ProviderKind::OpenAi)
            .with_base_url("http://localhost:1234/v1")
            .with_model("llama-3");
        assert_eq!(settings.effective_base_url(), "http://localhost:1234/v1");
        assert_eq!(settings.effective_model(), "llama-3");
    }

    #[test]
    fn test_debug_redacts_key() {
        let settings = ProviderSettings::new(ProviderKind::Gemini).with_api_key("super-secret");
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
