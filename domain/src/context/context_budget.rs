//! Token budget for the transcript sent with each model request.
//!
//! Sizes are estimated, not counted: see [`estimate_tokens`](super::window::estimate_tokens).
//! Two presets matter in practice:
//!
//! - **default**: used for every regular turn
//! - **recovery**: used once after the provider rejected an oversized request

use serde::{Deserialize, Serialize};

/// Maximum estimated token count of transcript text in a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextBudget {
    max_tokens: usize,
}

impl ContextBudget {
    pub const DEFAULT_TOKENS: usize = 2_500;
    pub const RECOVERY_TOKENS: usize = 1_000;

    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    /// Drastically smaller budget for the single recovery attempt
    pub fn recovery() -> Self {
        Self::new(Self::RECOVERY_TOKENS)
    }

    /// No trimming at all
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Validate this budget, returning a list of issues.
    pub fn validate(&self, name: &str) -> Vec<String> {
        let mut issues = Vec::new();
        if self.max_tokens == 0 {
            issues.push(format!("{}: budget must be greater than 0 tokens", name));
        }
        issues
    }
}

impl Default for ContextBudget {
    /// Default: 2500 estimated tokens.
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOKENS)
    }
}
