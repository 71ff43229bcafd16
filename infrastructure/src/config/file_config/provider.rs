//! Provider configuration from TOML (`[provider]` section)

use super::ConfigValidationError;
use parley_domain::{ProviderKind, ProviderSettings};
use serde::{Deserialize, Serialize};

/// Settings for one provider (`[provider.<kind>]`).
///
/// Prefer `api_key_env` over a literal `api_key` in shared config files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderEntry {
    /// Environment variable holding the API key (default: `<KIND>_API_KEY`).
    pub api_key_env: Option<String>,
    /// Direct API key (prefer an environment variable).
    pub api_key: Option<String>,
    /// Override of the provider's default endpoint.
    pub base_url: Option<String>,
    /// Override of the provider's default model.
    pub model: Option<String>,
}

impl FileProviderEntry {
    /// Direct key first, then the environment variable
    pub fn resolve_api_key(
        &self,
        kind: ProviderKind,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Option<String> {
        if let Some(key) = self.api_key.as_deref().map(str::trim)
            && !key.is_empty()
        {
            return Some(key.to_string());
        }
        let var = self
            .api_key_env
            .clone()
            .unwrap_or_else(|| default_api_key_env(kind).to_string());
        lookup(&var).filter(|k| !k.trim().is_empty())
    }
}

/// Environment variable consulted when `api_key_env` is not set
pub fn default_api_key_env(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Gemini => "GEMINI_API_KEY",
        ProviderKind::OpenAi => "OPENAI_API_KEY",
        ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        ProviderKind::ModelScope => "MODELSCOPE_API_KEY",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// Active provider: "gemini", "openai", "openrouter" or "modelscope".
    pub kind: String,
    pub gemini: FileProviderEntry,
    /// OpenAI or any OpenAI-compatible (local) server.
    pub openai: FileProviderEntry,
    pub openrouter: FileProviderEntry,
    pub modelscope: FileProviderEntry,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default().as_str().to_string(),
            gemini: FileProviderEntry::default(),
            openai: FileProviderEntry::default(),
            openrouter: FileProviderEntry::default(),
            modelscope: FileProviderEntry::default(),
        }
    }
}

impl FileProviderConfig {
    pub fn parse_kind(&self) -> (ProviderKind, Option<ConfigValidationError>) {
        match self.kind.parse::<ProviderKind>() {
            Ok(kind) => (kind, None),
            Err(_) => (
                ProviderKind::default(),
                Some(ConfigValidationError::UnknownProvider(self.kind.clone())),
            ),
        }
    }

    pub fn entry(&self, kind: ProviderKind) -> &FileProviderEntry {
        match kind {
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::OpenRouter => &self.openrouter,
            ProviderKind::ModelScope => &self.modelscope,
        }
    }

    /// Settings of `kind`, reading the API key from the process environment
    pub fn to_settings(&self, kind: ProviderKind) -> ProviderSettings {
        self.to_settings_with(kind, |var| std::env::var(var).ok())
    }

    pub fn to_settings_with(
        &self,
        kind: ProviderKind,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ProviderSettings {
        let entry = self.entry(kind);
        ProviderSettings {
            kind,
            api_key: entry.resolve_api_key(kind, lookup),
            base_url: entry.base_url.clone(),
            model: entry.model.clone(),
        }
    }
}
