//! Cast Experts use case
//!
//! Fills the two expert slots for a topic. Slots fixed by the user are taken
//! from the preset roster; `auto` slots are chosen by the model. Any failure
//! of the model round trip falls back to The Analyst and The Visionary.

use crate::ports::model_client::{CompletionRequest, ModelClient};
use parley_domain::{
    Cast, ExpertChoice, Persona, PresetExpert, PromptTemplate, ProviderSettings,
    parse_casting_response,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during casting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastingError {
    #[error("Unknown expert '{0}'. Available: {1}")]
    UnknownExpert(String, String),
}

/// Input for the CastExperts use case
#[derive(Debug, Clone)]
pub struct CastExpertsInput {
    pub topic: String,
    pub facilitator: Persona,
    pub expert_a: ExpertChoice,
    pub expert_b: ExpertChoice,
    pub provider: ProviderSettings,
}

impl CastExpertsInput {
    pub fn new(topic: impl Into<String>, provider: ProviderSettings) -> Self {
        Self {
            topic: topic.into(),
            facilitator: Persona::default_facilitator(),
            expert_a: ExpertChoice::Auto,
            expert_b: ExpertChoice::Auto,
            provider,
        }
    }

    pub fn with_facilitator(mut self, facilitator: Persona) -> Self {
        self.facilitator = facilitator;
        self
    }

    pub fn with_experts(mut self, expert_a: ExpertChoice, expert_b: ExpertChoice) -> Self {
        self.expert_a = expert_a;
        self.expert_b = expert_b;
        self
    }
}

/// Result of casting
#[derive(Debug, Clone)]
pub struct CastingResult {
    pub cast: Cast,
    /// The model's explanation, when it chose any slot
    pub reasoning: Option<String>,
    /// True when an `auto` slot got the fallback expert
    pub fell_back: bool,
}

/// Use case for choosing the experts of a session
pub struct CastExpertsUseCase<C: ModelClient + 'static> {
    client: Arc<C>,
}

impl<C: ModelClient + 'static> CastExpertsUseCase<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn execute(&self, input: CastExpertsInput) -> Result<CastingResult, CastingError> {
        let fixed_a = resolve_preset(&input.expert_a)?;
        let fixed_b = resolve_preset(&input.expert_b)?;

        if let (Some(a), Some(b)) = (&fixed_a, &fixed_b) {
            debug!("Both experts fixed: {} / {}", a.id, b.id);
            return Ok(CastingResult {
                cast: Cast::new(input.facilitator, a.persona.clone(), b.persona.clone()),
                reasoning: None,
                fell_back: false,
            });
        }

        let roster = PresetExpert::roster();
        let decision = if input.provider.has_credentials() {
            let request = CompletionRequest::new(
                input.provider.clone(),
                PromptTemplate::casting_system(&input.topic, &roster),
                PromptTemplate::casting_prompt(),
            );
            match self.client.complete(&request).await {
                Ok(reply) => {
                    let parsed = parse_casting_response(&reply);
                    if parsed.is_none() {
                        warn!("Casting reply had no usable JSON, using default experts");
                    }
                    parsed
                }
                Err(e) => {
                    warn!("Casting failed, falling back to Analyst/Visionary: {}", e);
                    None
                }
            }
        } else {
            warn!("No credentials for casting, using default experts");
            None
        };

        let mut fell_back = false;
        let mut pick = |fixed: Option<PresetExpert>, chosen: Option<PresetExpert>, fallback: usize| {
            fixed.or(chosen).unwrap_or_else(|| {
                fell_back = true;
                roster[fallback].clone()
            })
        };

        let chosen_a = decision.as_ref().and_then(|d| d.expert_a());
        let chosen_b = decision.as_ref().and_then(|d| d.expert_b());
        let expert_a = pick(fixed_a, chosen_a, 0);
        let expert_b = pick(fixed_b, chosen_b, 1);

        info!("Cast: {} and {}", expert_a.persona.name, expert_b.persona.name);
        Ok(CastingResult {
            cast: Cast::new(input.facilitator, expert_a.persona, expert_b.persona),
            reasoning: decision.and_then(|d| d.reasoning),
            fell_back,
        })
    }
}

fn resolve_preset(choice: &ExpertChoice) -> Result<Option<PresetExpert>, CastingError> {
    match choice {
        ExpertChoice::Auto => Ok(None),
        ExpertChoice::Preset(id) => PresetExpert::find(id).map(Some).ok_or_else(|| {
            let available = PresetExpert::roster()
                .iter()
                .map(|p| p.id)
                .collect::<Vec<_>>()
                .join(", ");
            CastingError::UnknownExpert(id.clone(), available)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_client::ModelError;
    use crate::use_cases::test_support::MockClient;
    use parley_domain::ProviderKind;

    fn input() -> CastExpertsInput {
        CastExpertsInput::new("Should cities ban cars?", ProviderSettings::new(ProviderKind::OpenAi))
    }

    #[tokio::test]
    async fn test_auto_uses_model_choice() {
        let client = Arc::new(MockClient::new(vec![Ok(
            "Sure! {\"reasoning\": \"past vs future\", \"expertAId\": \"historian\", \"expertBId\": \"futurist\"}"
                .to_string(),
        )]));
        let use_case = CastExpertsUseCase::new(Arc::clone(&client));

        let result = use_case.execute(input()).await.unwrap();

        assert_eq!(result.cast.expert_a.name, "The Historian");
        assert_eq!(result.cast.expert_b.name, "The Futurist");
        assert_eq!(result.reasoning.as_deref(), Some("past vs future"));
        assert!(!result.fell_back);
        assert!(client.requests()[0].instructions.contains("Should cities ban cars?"));
    }

    #[tokio::test]
    async fn test_fixed_slot_overrides_model() {
        let client = Arc::new(MockClient::new(vec![Ok(
            r#"{"expertAId": "historian", "expertBId": "futurist"}"#.to_string(),
        )]));
        let use_case = CastExpertsUseCase::new(client);

        let result = use_case
            .execute(input().with_experts(
                ExpertChoice::Preset("skeptic".to_string()),
                ExpertChoice::Auto,
            ))
            .await
            .unwrap();

        assert_eq!(result.cast.expert_a.name, "The Skeptic");
        assert_eq!(result.cast.expert_b.name, "The Futurist");
    }

    #[tokio::test]
    async fn test_both_fixed_skips_model() {
        let client = Arc::new(MockClient::new(vec![]));
        let use_case = CastExpertsUseCase::new(Arc::clone(&client));

        let result = use_case
            .execute(input().with_experts(
                ExpertChoice::Preset("ethicist".to_string()),
                ExpertChoice::Preset("realist".to_string()),
            ))
            .await
            .unwrap();

        assert_eq!(client.call_count(), 0);
        assert_eq!(result.cast.expert_b.name, "The Realist");
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let client = Arc::new(MockClient::new(vec![Err(ModelError::Timeout)]));
        let use_case = CastExpertsUseCase::new(client);

        let result = use_case.execute(input()).await.unwrap();

        assert!(result.fell_back);
        assert_eq!(result.cast.expert_a.name, "The Analyst");
        assert_eq!(result.cast.expert_b.name, "The Visionary");
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back() {
        let client = Arc::new(MockClient::new(vec![Ok("I pick the historian.".to_string())]));
        let result = CastExpertsUseCase::new(client).execute(input()).await.unwrap();
        assert!(result.fell_back);
        assert_eq!(result.cast.expert_a.name, "The Analyst");
    }

    #[tokio::test]
    async fn test_unknown_preset_is_an_error() {
        let client = Arc::new(MockClient::new(vec![]));
        let err = CastExpertsUseCase::new(client)
            .execute(input().with_experts(
                ExpertChoice::Preset("astrologer".to_string()),
                ExpertChoice::Auto,
            ))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("astrologer"));
        assert!(err.to_string().contains("analyst"));
    }
}
