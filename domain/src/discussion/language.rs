//! Discussion language

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Language every agent must answer in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Chinese,
    Japanese,
    Spanish,
}

impl Language {
    pub fn as_str(&self) -> &str {
        match self {
            Language::English => "English",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
            Language::Spanish => "Spanish",
        }
    }

    /// Name used inside prompts, precise enough for the model to pick a variant
    pub fn prompt_name(&self) -> &str {
        match self {
            Language::Chinese => "Simplified Chinese (Mandarin)",
            other => other.as_str(),
        }
    }

    pub fn all() -> [Language; 4] {
        [
            Language::English,
            Language::Chinese,
            Language::Japanese,
            Language::Spanish,
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "chinese" | "zh" | "中文" => Ok(Language::Chinese),
            "japanese" | "ja" | "日本語" => Ok(Language::Japanese),
            "spanish" | "es" | "español" => Ok(Language::Spanish),
            _ => Err(DomainError::UnknownLanguage(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_codes() {
        assert_eq!("Japanese".parse::<Language>().unwrap(), Language::Japanese);
        assert_eq!("zh".parse::<Language>().unwrap(), Language::Chinese);
        assert_eq!(" spanish ".parse::<Language>().unwrap(), Language::Spanish);
        assert!("Klingon".parse::<Language>().is_err());
    }

    #[test]
    fn test_prompt_name() {
        assert_eq!(Language::Chinese.prompt_name(), "Simplified Chinese (Mandarin)");
        assert_eq!(Language::English.prompt_name(), "English");
    }
}
