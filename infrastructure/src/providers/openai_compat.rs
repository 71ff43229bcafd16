//! OpenAI chat-completions wire format.
//!
//! Used for OpenAI itself, OpenRouter, ModelScope and local servers that
//! mimic the OpenAI API.

use super::{ProviderAdapter, TEMPERATURE, connection_error, provider_error};
use async_trait::async_trait;
use parley_application::ports::model_client::{CompletionRequest, ModelError};
use parley_domain::ProviderKind;
use serde::{Deserialize, Serialize};

const OPENROUTER_REFERER: &str = "https://github.com/xq-chen/panda-parley";
const OPENROUTER_TITLE: &str = "PandaParley";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Append `/chat/completions` to a base URL unless it already ends with it
pub fn chat_endpoint(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{}/chat/completions", base)
    }
}

fn build_body(request: &CompletionRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: request.provider.effective_model(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: &request.instructions,
            },
            ChatMessage {
                role: "user",
                content: &request.context,
            },
        ],
        temperature: TEMPERATURE,
    }
}

fn parse_body(body: &str) -> Result<String, ModelError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ModelError::InvalidResponse(format!("Malformed completion: {}", e)))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ModelError::InvalidResponse("Completion had no content".to_string()))
}

pub struct OpenAiCompatAdapter;

#[async_trait]
impl ProviderAdapter for OpenAiCompatAdapter {
    fn supports(&self, kind: ProviderKind) -> bool {
        kind.is_openai_compatible()
    }

    async fn complete(
        &self,
        http: &reqwest::Client,
        request: &CompletionRequest,
    ) -> Result<String, ModelError> {
        let settings = &request.provider;
        let endpoint = chat_endpoint(settings.effective_base_url());

        let mut builder = http
            .post(&endpoint)
            .bearer_auth(settings.api_key().unwrap_or_default())
            .json(&build_body(request));
        if settings.kind == ProviderKind::OpenRouter {
            builder = builder
                .header("HTTP-Referer", OPENROUTER_REFERER)
                .header("X-Title", OPENROUTER_TITLE);
        }

        let response = builder.send().await.map_err(connection_error)?;
        if !response.status().is_success() {
            return Err(provider_error(settings.kind, response).await);
        }

        let body = response.text().await.map_err(connection_error)?;
        parse_body(&body)
    }
}
