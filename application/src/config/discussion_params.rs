//! Discussion parameters: turn loop control.
//!
//! [`DiscussionParams`] groups the static parameters that shape each model
//! request made by the [`TurnOrchestrator`](crate::use_cases::orchestrator::TurnOrchestrator)
//! and the pacing of the [`AutoPlayDriver`](crate::use_cases::auto_play::AutoPlayDriver).

use parley_domain::ContextBudget;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionParams {
    /// Transcript budget of a regular request.
    pub context_budget: ContextBudget,
    /// Transcript budget of the single recovery request.
    pub recovery_budget: ContextBudget,
    /// Delay between automatic turns.
    pub autoplay_interval: Duration,
    /// Upper bound on a single model request. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl Default for DiscussionParams {
    fn default() -> Self {
        Self {
            context_budget: ContextBudget::default(),
            recovery_budget: ContextBudget::recovery(),
            autoplay_interval: Duration::from_millis(2_000),
            request_timeout: Some(Duration::from_secs(120)),
        }
    }
}

impl DiscussionParams {
    // ==================== Builder Methods ====================

    pub fn with_context_budget(mut self, budget: ContextBudget) -> Self {
        self.context_budget = budget;
        self
    }

    pub fn with_recovery_budget(mut self, budget: ContextBudget) -> Self {
        self.recovery_budget = budget;
        self
    }

    pub fn with_autoplay_interval(mut self, interval: Duration) -> Self {
        self.autoplay_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validate the parameters, returning a list of issues.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = self.context_budget.validate("context_budget");
        issues.extend(self.recovery_budget.validate("recovery_budget"));
        if issues.is_empty()
            && self.recovery_budget.max_tokens() >= self.context_budget.max_tokens()
        {
            issues.push(format!(
                "recovery_budget: must be smaller than context_budget ({} >= {})",
                self.recovery_budget.max_tokens(),
                self.context_budget.max_tokens()
            ));
        }
        if self.autoplay_interval.is_zero() {
            issues.push("autoplay_interval: must be greater than 0ms".to_string());
        }
        issues
    }
}
