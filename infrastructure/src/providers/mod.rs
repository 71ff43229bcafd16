//! Model provider adapters
//!
//! Each adapter speaks one wire format. [`RoutingModelClient`] picks the
//! adapter for the provider named in the request.

pub mod gemini;
pub mod openai_compat;
pub mod routing;

use async_trait::async_trait;
use parley_application::ports::model_client::{CompletionRequest, ModelError};
use parley_domain::ProviderKind;

pub use gemini::GeminiAdapter;
pub use openai_compat::OpenAiCompatAdapter;
pub use routing::RoutingModelClient;

/// Sampling temperature used for every discussion turn
pub const TEMPERATURE: f32 = 0.7;

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn supports(&self, kind: ProviderKind) -> bool;

    async fn complete(
        &self,
        http: &reqwest::Client,
        request: &CompletionRequest,
    ) -> Result<String, ModelError>;
}

/// Pull `error.message` out of a provider error body, if there is one
pub(crate) fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message").or(Some(e)))
        .and_then(|m| m.as_str())
        .map(|m| m.to_string())
}

/// Turn a non-success HTTP response into a [`ModelError`]
pub(crate) async fn provider_error(kind: ProviderKind, response: reqwest::Response) -> ModelError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
    ModelError::ProviderError {
        provider: kind.as_str().to_string(),
        status: status.as_u16(),
        message,
    }
}

/// Transport failure as a [`ModelError`]. The request URL is dropped from
/// the message since it ends up in the visible transcript.
pub(crate) fn connection_error(err: reqwest::Error) -> ModelError {
    if err.is_timeout() {
        ModelError::Timeout
    } else {
        ModelError::ConnectionError(err.without_url().to_string())
    }
}
