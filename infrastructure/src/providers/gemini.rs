//! Google Gemini `generateContent` wire format.

use super::{ProviderAdapter, TEMPERATURE, connection_error, provider_error};
use async_trait::async_trait;
use parley_application::ports::model_client::{CompletionRequest, ModelError};
use parley_domain::ProviderKind;
use serde_json::{Value, json};

/// Header carrying the API key, kept out of the URL
const API_KEY_HEADER: &str = "x-goog-api-key";

/// `{base}/models/{model}:generateContent`
pub fn generate_endpoint(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim().trim_end_matches('/'),
        model
    )
}

fn build_body(request: &CompletionRequest) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{ "text": request.instructions }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.context }]
        }],
        "generationConfig": { "temperature": TEMPERATURE }
    })
}

/// Concatenate the text parts of the first candidate
fn parse_body(data: &Value) -> Result<String, ModelError> {
    let parts = data
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| ModelError::InvalidResponse("No candidates in response".to_string()))?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if text.trim().is_empty() {
        return Err(ModelError::InvalidResponse("Completion had no content".to_string()));
    }
    Ok(text)
}

pub struct GeminiAdapter;

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn supports(&self, kind: ProviderKind) -> bool {
        kind == ProviderKind::Gemini
    }

    async fn complete(
        &self,
        http: &reqwest::Client,
        request: &CompletionRequest,
    ) -> Result<String, ModelError> {
        let settings = &request.provider;
        let api_key = settings
            .api_key()
            .ok_or_else(|| ModelError::MissingCredentials(settings.kind.display_name().to_string()))?;
        let url = generate_endpoint(settings.effective_base_url(), settings.effective_model());

        let response = http
            .post(&url)
            .header(API_KEY_HEADER, api_key)
            .json(&build_body(request))
            .send()
            .await
            .map_err(connection_error)?;
        if !response.status().is_success() {
            return Err(provider_error(settings.kind, response).await);
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.without_url().to_string()))?;
        parse_body(&data)
    }
}
