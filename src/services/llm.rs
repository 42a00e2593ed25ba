//! Keywords from a chat LLM, as an alternative to the NLU service.
//!
//! Any provider `edgequake-llm` supports works here. Provider resolution
//! goes from most to least specific:
//!
//! 1. `llm_provider` (+ optional `llm_model`) from [`ServiceConfig`]
//! 2. `OPENAI_API_KEY` present → OpenAI with the default model
//! 3. [`ProviderFactory::from_env`] auto-detection
//!
//! Each call is bounded by the run's request timeout.

use super::KeywordExtractor;
use crate::config::ServiceConfig;
use crate::error::{EnrichmentStage, SlidesError};
use crate::prompts::{keyword_request, parse_keyword_reply, KEYWORD_SYSTEM_PROMPT};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::debug;

const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// [`KeywordExtractor`] that asks an LLM for keywords.
pub struct LlmKeywordExtractor {
    provider: Arc<dyn LLMProvider>,
    timeout: Duration,
}

impl LlmKeywordExtractor {
    pub fn new(provider: Arc<dyn LLMProvider>, timeout_secs: u64) -> Self {
        Self {
            provider,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn from_config(services: &ServiceConfig, timeout_secs: u64) -> Result<Self, SlidesError> {
        Ok(Self::new(resolve_provider(services)?, timeout_secs))
    }
}

fn create_provider(name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, SlidesError> {
    ProviderFactory::create_llm_provider(name, model).map_err(|e| {
        SlidesError::ServiceNotConfigured {
            service: format!("llm:{name}"),
            hint: format!("{e}"),
        }
    })
}

fn resolve_provider(services: &ServiceConfig) -> Result<Arc<dyn LLMProvider>, SlidesError> {
    let model = services.llm_model.as_deref().unwrap_or(DEFAULT_MODEL);

    if let Some(ref name) = services.llm_provider {
        return create_provider(name, model);
    }

    if std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty()) {
        return create_provider("openai", model);
    }

    let (provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| SlidesError::ServiceNotConfigured {
            service: "llm".into(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or EDGEQUAKE_LLM_PROVIDER.\n\
                Error: {e}"
            ),
        })?;
    Ok(provider)
}

fn options() -> CompletionOptions {
    CompletionOptions {
        temperature: Some(0.0),
        max_tokens: Some(64),
        ..Default::default()
    }
}

#[async_trait]
impl KeywordExtractor for LlmKeywordExtractor {
    async fn extract(&self, sentence: &str) -> Result<Vec<String>, SlidesError> {
        let failed = |detail: String| SlidesError::EnrichmentFailed {
            stage: EnrichmentStage::Keywords,
            sentence: 0,
            detail,
        };

        let messages = vec![
            ChatMessage::system(KEYWORD_SYSTEM_PROMPT),
            ChatMessage::user(&keyword_request(sentence)),
        ];
        let opts = options();

        let response = timeout(self.timeout, self.provider.chat(&messages, Some(&opts)))
            .await
            .map_err(|_| failed(format!("LLM call timed out after {}s", self.timeout.as_secs())))?
            .map_err(|e| failed(format!("LLM call failed: {e}")))?;

        debug!(
            "LLM keywords: {} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );
        Ok(parse_keyword_reply(&response.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_are_deterministic_and_short() {
        let opts = options();
        assert_eq!(opts.temperature, Some(0.0));
        assert_eq!(opts.max_tokens, Some(64));
    }
}
