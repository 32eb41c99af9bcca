use std::time::Duration;

use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_openai::{Client, config::OpenAIConfig};
use tracing::{error, info, warn};

use crate::config::AiConfig;
use crate::i18n::Language;

use super::error::{AiError, Result};
use super::parser::{self, AiExplanation};
use super::prompt::{self, ExplainContext};

/// Explains commands through an OpenAI-compatible chat completion API.
///
/// Without an API key the explainer is unavailable and every call returns
/// a localized mock explanation.
pub struct AiExplainer {
    client: Option<Client<OpenAIConfig>>,
    pub model: String,
    language: Language,
    timeout: Duration,
    max_retries: u32,
    temperature: f32,
    max_tokens: u32,
}

impl AiExplainer {
    pub fn new(config: &AiConfig, language: Language) -> Self {
        let client = config.api_key().map(|key| {
            let mut openai = OpenAIConfig::new().with_api_key(key);
            if let Some(base) = config.api_base.as_deref().filter(|b| !b.trim().is_empty()) {
                openai = openai.with_api_base(base.trim_end_matches('/'));
            }
            Client::with_config(openai)
        });

        if client.is_none() {
            warn!("no API key configured, AI explanations will be mocked");
        }

        Self {
            client,
            model: config.model.clone(),
            language,
            timeout: Duration::from_secs(config.timeout_secs.max(1)),
            max_retries: config.max_retries.max(1),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Explain `command`, retrying failed requests. Falls back to a mock
    /// explanation when the service is unavailable or every attempt fails.
    pub async fn explain(&self, command: &str, ctx: &ExplainContext) -> AiExplanation {
        if !self.is_available() {
            return parser::mock_explanation(command, self.language);
        }

        for attempt in 1..=self.max_retries {
            match self.try_explain(command, ctx).await {
                Ok(explanation) => {
                    info!(attempt, "explained command via AI");
                    return explanation;
                }
                Err(e) => warn!(attempt, max = self.max_retries, error = %e, "AI request failed"),
            }
        }

        error!("all AI attempts failed, using mock explanation");
        parser::mock_explanation(command, self.language)
    }

    /// One request, no retry and no fallback.
    pub async fn try_explain(&self, command: &str, ctx: &ExplainContext) -> Result<AiExplanation> {
        let system = prompt::system_prompt(self.language);
        let user = prompt::build_user_prompt(command, ctx, self.language);
        let response = self.complete(system, &user).await?;
        Ok(parser::parse_explanation(&response, self.language))
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let client = self.client.as_ref().ok_or(AiError::Unavailable)?;

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user)
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_completion_tokens(self.max_tokens)
            .build()?;

        let response = tokio::time::timeout(self.timeout, client.chat().create(request))
            .await
            .map_err(|_| AiError::Timeout(self.timeout))??;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ai::parser::ExplanationSource;

    #[test]
    fn test_unavailable_without_key() {
        let explainer = AiExplainer::new(&AiConfig::default(), Language::En);
        assert!(!explainer.is_available());

        let config = AiConfig {
            api_key: Some("  ".to_string()),
            ..AiConfig::default()
        };
        assert!(!AiExplainer::new(&config, Language::En).is_available());
    }

    #[test]
    fn test_available_with_key() {
        let config = AiConfig {
            api_key: Some("sk-test".to_string()),
            api_base: Some("http://localhost:11434/v1/".to_string()),
            model: "llama3.2".to_string(),
            ..AiConfig::default()
        };
        let explainer = AiExplainer::new(&config, Language::Zh);
        assert!(explainer.is_available());
        assert_eq!(explainer.model, "llama3.2");
    }

    #[test]
    fn test_zero_limits_are_raised() {
        let config = AiConfig {
            timeout_secs: 0,
            max_retries: 0,
            ..AiConfig::default()
        };
        let explainer = AiExplainer::new(&config, Language::En);
        assert_eq!(explainer.timeout, Duration::from_secs(1));
        assert_eq!(explainer.max_retries, 1);
    }

    #[tokio::test]
    async fn test_explain_without_key_is_mocked() {
        let mut explainer = AiExplainer::new(&AiConfig::default(), Language::En);
        let explanation = explainer.explain("ls -la", &ExplainContext::default()).await;
        assert_eq!(explanation.source, ExplanationSource::Mock);
        assert_eq!(explanation.summary, "Execute ls -la...");

        explainer.set_language(Language::Zh);
        let explanation = explainer.explain("ls -la", &ExplainContext::default()).await;
        assert_eq!(explanation.summary, "执行 ls -la...");
    }

    #[tokio::test]
    async fn test_try_explain_without_key_errors() {
        let explainer = AiExplainer::new(&AiConfig::default(), Language::En);
        let result = explainer.try_explain("ls", &ExplainContext::default()).await;
        assert!(matches!(result, Err(AiError::Unavailable)));
    }
}
