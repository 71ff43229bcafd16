//! Failure classification for model requests.
//!
//! Providers report an oversized prompt in many shapes (`400 Bad Request`,
//! "context length exceeded", "invalid argument"). The error text is the only
//! portable signal, so classification is a substring match on it.

use crate::ports::model_client::ModelError;

/// Substrings (lowercase) marking a request the provider found too large
const OVERSIZED_SIGNATURES: [&str; 3] = ["400", "context", "argument"];

/// How a failed model request should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Retry once with a much smaller context
    Recoverable,
    /// Surface to the user; no retry
    Terminal,
}

impl FailureClass {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FailureClass::Recoverable)
    }
}

/// Classify a failed model request by its description
pub fn classify(error: &ModelError) -> FailureClass {
    classify_message(&error.to_string())
}

pub fn classify_message(message: &str) -> FailureClass {
    let message = message.to_lowercase();
    if OVERSIZED_SIGNATURES.iter().any(|s| message.contains(s)) {
        FailureClass::Recoverable
    } else {
        FailureClass::Terminal
    }
}
