use super::{GeminiAdapter, OpenAiCompatAdapter, ProviderAdapter};
use async_trait::async_trait;
use parley_application::ports::model_client::{CompletionRequest, ModelClient, ModelError};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// [`ModelClient`] that routes each request to the adapter for its provider.
///
/// One `reqwest::Client` (and its connection pool) is shared by all adapters.
pub struct RoutingModelClient {
    http: reqwest::Client,
    adapters: Vec<Arc<dyn ProviderAdapter>>,
}

impl RoutingModelClient {
    pub fn new(http: reqwest::Client, adapters: Vec<Arc<dyn ProviderAdapter>>) -> Self {
        Self { http, adapters }
    }

    /// Client with every built-in adapter
    pub fn with_default_adapters(timeout: Option<Duration>) -> Result<Self, ModelError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "PandaParley/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ModelError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::new(
            http,
            vec![
                Arc::new(GeminiAdapter),
                Arc::new(OpenAiCompatAdapter),
            ],
        ))
    }

    fn resolve(&self, request: &CompletionRequest) -> Result<&dyn ProviderAdapter, ModelError> {
        let kind = request.provider.kind;
        self.adapters
            .iter()
            .find(|a| a.supports(kind))
            .map(|a| a.as_ref())
            .ok_or_else(|| ModelError::Other(format!("No adapter for provider {}", kind)))
    }
}

#[async_trait]
impl ModelClient for RoutingModelClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ModelError> {
        let adapter = self.resolve(request)?;
        debug!(
            "Completion via {} ({})",
            request.provider.kind,
            request.provider.effective_model()
        );
        adapter.complete(&self.http, request).await
    }
}
