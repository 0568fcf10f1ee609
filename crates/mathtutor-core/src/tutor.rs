//! Free-form tutoring answers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompt::tutor_prompt;
use crate::traits::{GenerateRequest, LlmProvider};

/// Configuration for tutor requests.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.2,
            max_tokens: 800,
        }
    }
}

/// Errors from a tutor request.
#[derive(Debug, Error)]
pub enum TutorError {
    #[error("question is required")]
    EmptyQuestion,

    #[error("provider request failed: {0:#}")]
    Provider(anyhow::Error),

    #[error("model returned an empty answer")]
    EmptyAnswer,
}

/// A tutor reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TutorAnswer {
    pub answer: String,
    pub model: String,
}

/// Answers student questions with step-by-step explanations.
pub struct Tutor {
    provider: Arc<dyn LlmProvider>,
    config: TutorConfig,
}

impl Tutor {
    pub fn new(provider: Arc<dyn LlmProvider>, config: TutorConfig) -> Self {
        Self { provider, config }
    }

    pub async fn ask(&self, question: &str) -> Result<TutorAnswer, TutorError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(TutorError::EmptyQuestion);
        }

        let preview: String = question.chars().take(50).collect();
        tracing::info!(question = %preview, model = %self.config.model, "tutor request");

        let request = GenerateRequest {
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            ..GenerateRequest::new(self.config.model.clone(), tutor_prompt(question))
        };

        let response = self
            .provider
            .generate(&request)
            .await
            .map_err(TutorError::Provider)?;

        if response.content.trim().is_empty() {
            return Err(TutorError::EmptyAnswer);
        }

        tracing::debug!(chars = response.content.len(), "tutor answer received");
        Ok(TutorAnswer {
            answer: response.content,
            model: response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::traits::{GenerateResponse, ModelInfo, TokenUsage};

    struct EchoProvider;

    #[async_trait]
    impl LlmProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            let content = if request.prompt.contains("silence") {
                "  ".to_string()
            } else {
                format!("max_tokens={} :: {}", request.max_tokens, request.prompt)
            };
            Ok(GenerateResponse {
                content,
                model: request.model.clone(),
                token_usage: TokenUsage::default(),
                latency_ms: 0,
            })
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    #[tokio::test]
    async fn answers_with_tutor_prompt() {
        let tutor = Tutor::new(Arc::new(EchoProvider), TutorConfig::default());
        let answer = tutor.ask("What is 3 squared?").await.unwrap();
        assert!(answer.answer.starts_with("max_tokens=800"));
        assert!(answer.answer.contains("helpful math tutor"));
        assert_eq!(answer.model, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn rejects_blank_question_and_blank_answer() {
        let tutor = Tutor::new(Arc::new(EchoProvider), TutorConfig::default());
        assert!(matches!(
            tutor.ask(" \n").await,
            Err(TutorError::EmptyQuestion)
        ));
        assert!(matches!(
            tutor.ask("silence please").await,
            Err(TutorError::EmptyAnswer)
        ));
    }
}
