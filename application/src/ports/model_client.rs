//! Model client port
//!
//! Defines the interface for requesting a single completion from a model
//! provider.

use async_trait::async_trait;
use parley_domain::ProviderSettings;
use thiserror::Error;

/// Errors that can occur during a completion request.
///
/// The orchestrator treats the rendered message as an opaque signal when
/// deciding whether a failure is worth a reduced-context retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("API Error ({provider}): {status} {message}")]
    ProviderError {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key for {0}")]
    MissingCredentials(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// One stateless completion request.
///
/// `instructions` become the system prompt, `context` the user message
/// carrying the formatted transcript.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub provider: ProviderSettings,
    pub instructions: String,
    pub context: String,
}

impl CompletionRequest {
    pub fn new(
        provider: ProviderSettings,
        instructions: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            instructions: instructions.into(),
            context: context.into(),
        }
    }

    /// Same instructions and provider with a different context block
    pub fn with_context(&self, context: impl Into<String>) -> Self {
        Self {
            provider: self.provider.clone(),
            instructions: self.instructions.clone(),
            context: context.into(),
        }
    }
}

/// Client for model completions
///
/// This port defines how the application layer talks to model providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the request and return the generated text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_domain::ProviderKind;

    #[test]
    fn test_provider_error_display_carries_status() {
        let err = ModelError::ProviderError {
            provider: "openrouter".to_string(),
            status: 400,
            message: "Bad Request".to_string(),
        };
        assert_eq!(err.to_string(), "API Error (openrouter): 400 Bad Request");
    }

    #[test]
    fn test_with_context_keeps_instructions() {
        let request = CompletionRequest::new(
            ProviderSettings::new(ProviderKind::OpenAi),
            "be brief",
            "long history",
        );
        let retry = request.with_context("short history");
        assert_eq!(retry.instructions, "be brief");
        assert_eq!(retry.context, "short history");
        assert_eq!(retry.provider, request.provider);
    }
}
