//! Discussion configuration from TOML (`[discussion]` section)

use super::ConfigValidationError;
use parley_application::DiscussionParams;
use parley_domain::{ContextBudget, Language};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// # Example
///
/// ```toml
/// [discussion]
/// language = "spanish"
/// autoplay_interval_ms = 2000
/// context_budget = 2500
/// recovery_budget = 1000
/// request_timeout_seconds = 120
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    /// "english", "chinese", "japanese" or "spanish" (or a language code).
    pub language: String,
    /// Delay between automatic turns.
    pub autoplay_interval_ms: u64,
    /// Estimated-token budget of the transcript in a regular request.
    pub context_budget: usize,
    /// Budget of the single retry after an oversized request.
    pub recovery_budget: usize,
    /// Upper bound on one model request.
    pub request_timeout_seconds: u64,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        let params = DiscussionParams::default();
        Self {
            language: Language::default().as_str().to_string(),
            autoplay_interval_ms: params.autoplay_interval.as_millis() as u64,
            context_budget: params.context_budget.max_tokens(),
            recovery_budget: params.recovery_budget.max_tokens(),
            request_timeout_seconds: params
                .request_timeout
                .map(|t| t.as_secs())
                .unwrap_or(120),
        }
    }
}

impl FileDiscussionConfig {
    pub fn parse_language(&self) -> (Language, Option<ConfigValidationError>) {
        match self.language.parse::<Language>() {
            Ok(language) => (language, None),
            Err(_) => (
                Language::default(),
                Some(ConfigValidationError::UnknownLanguage(self.language.clone())),
            ),
        }
    }

    /// Convert to [`DiscussionParams`], returning validation issues.
    ///
    /// Invalid values fall back to the defaults.
    pub fn to_params(&self) -> (DiscussionParams, Vec<ConfigValidationError>) {
        let defaults = DiscussionParams::default();
        let mut issues = Vec::new();

        let timeout = if self.request_timeout_seconds == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
            defaults.request_timeout
        } else {
            Some(Duration::from_secs(self.request_timeout_seconds))
        };

        let requested = DiscussionParams::default()
            .with_context_budget(ContextBudget::new(self.context_budget))
            .with_recovery_budget(ContextBudget::new(self.recovery_budget))
            .with_autoplay_interval(Duration::from_millis(self.autoplay_interval_ms))
            .with_request_timeout(timeout);

        let problems = requested.validate();
        if problems.is_empty() {
            return (requested, issues);
        }

        let mut params = requested;
        for problem in problems {
            if problem.starts_with("context_budget") {
                params.context_budget = defaults.context_budget;
            } else if problem.starts_with("recovery_budget") {
                params.recovery_budget = defaults.recovery_budget;
            } else if problem.starts_with("autoplay_interval") {
                params.autoplay_interval = defaults.autoplay_interval;
            }
            issues.push(ConfigValidationError::InvalidDiscussion(problem));
        }
        if params.recovery_budget.max_tokens() >= params.context_budget.max_tokens() {
            let halved = (params.context_budget.max_tokens() / 2).max(1);
            params.recovery_budget = ContextBudget::new(halved);
        }
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_roundtrip_to_params() {
        let (params, issues) = FileDiscussionConfig::default().to_params();
        assert!(issues.is_empty());
        assert_eq!(params, DiscussionParams::default());
    }

    #[test]
    fn test_invalid_values_fall_back_individually() {
        let config = FileDiscussionConfig {
            context_budget: 0,
            autoplay_interval_ms: 500,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(issues.len(), 1);
        assert_eq!(params.context_budget, ContextBudget::default());
        assert_eq!(params.autoplay_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_recovery_budget_not_below_context_is_shrunk() {
        let config = FileDiscussionConfig {
            context_budget: 800,
            recovery_budget: 1_200,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().starts_with("recovery_budget"));
        assert_eq!(params.context_budget, ContextBudget::new(800));
        assert_eq!(params.recovery_budget, ContextBudget::new(400));
    }

    #[test]
    fn test_language_codes() {
        let config = FileDiscussionConfig {
            language: "zh".to_string(),
            ..Default::default()
        };
        assert_eq!(config.parse_language(), (Language::Chinese, None));
    }
}
