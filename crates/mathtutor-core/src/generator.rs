//! Question generation pipeline.
//!
//! Sends the question prompt for a chapter to a provider and runs the reply
//! through [`extract`]. A single model call per request: re-running the
//! pipeline after a failure is left to the caller.

use std::sync::Arc;

use thiserror::Error;

use crate::error::ExtractionError;
use crate::extract::extract;
use crate::model::QuestionBatch;
use crate::prompt::{question_prompt, QuestionMix};
use crate::traits::{GenerateRequest, LlmProvider};

/// Configuration for the question generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Max output tokens.
    pub max_tokens: u32,
    /// Top-k sampling cutoff.
    pub top_k: Option<u32>,
    /// Nucleus sampling cutoff.
    pub top_p: Option<f64>,
    /// Questions requested per difficulty.
    pub mix: QuestionMix,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.2,
            max_tokens: 4096,
            top_k: Some(40),
            top_p: Some(0.95),
            mix: QuestionMix::default(),
        }
    }
}

/// Errors from a question generation request.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The chapter name was blank.
    #[error("invalid chapter: expected a non-empty chapter name")]
    InvalidChapter,

    /// The provider call failed.
    #[error("provider request failed: {0:#}")]
    Provider(anyhow::Error),

    /// The reply could not be turned into a question batch.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Generates practice question batches for a chapter.
pub struct QuestionGenerator {
    provider: Arc<dyn LlmProvider>,
    config: GeneratorConfig,
}

impl QuestionGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn request_for(&self, chapter: &str) -> GenerateRequest {
        GenerateRequest {
            model: self.config.model.clone(),
            prompt: question_prompt(chapter, &self.config.mix),
            system_prompt: None,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_k: self.config.top_k,
            top_p: self.config.top_p,
            stop_sequences: vec![],
        }
    }

    /// Generate a validated question batch for `chapter`.
    pub async fn generate(&self, chapter: &str) -> Result<QuestionBatch, GenerationError> {
        let chapter = chapter.trim();
        if chapter.is_empty() {
            return Err(GenerationError::InvalidChapter);
        }

        tracing::info!(
            chapter,
            provider = self.provider.name(),
            model = %self.config.model,
            "generating questions"
        );

        let response = self
            .provider
            .generate(&self.request_for(chapter))
            .await
            .map_err(GenerationError::Provider)?;

        tracing::debug!(
            chars = response.content.len(),
            latency_ms = response.latency_ms,
            "model reply received"
        );

        let batch = extract(&response.content, chapter)?;
        tracing::info!(chapter, questions = batch.len(), "questions ready");
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::ExtractionErrorKind;
    use crate::traits::{GenerateResponse, ModelInfo, TokenUsage};

    struct CannedProvider {
        reply: anyhow::Result<String>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl CannedProvider {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(GenerateResponse {
                    content: text.clone(),
                    model: request.model.clone(),
                    token_usage: TokenUsage::default(),
                    latency_ms: 1,
                }),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }

        fn available_models(&self) -> Vec<ModelInfo> {
            vec![]
        }
    }

    const REPLY: &str = r#"```json
[{"question":"Factor x² - 9","options":[{"id":"a","text":"(x-3)(x+3)"},{"id":"b","text":"(x-9)(x+1)"},{"id":"c","text":"(x-3)²"},{"id":"d","text":"x(x-9)"}],"correctAnswer":"a","explanation":"Difference of squares.","difficulty":"Easy","subject":"Algebra"}]
```"#;

    #[tokio::test]
    async fn generates_batch_with_chapter_default() {
        let provider = Arc::new(CannedProvider::replying(REPLY));
        let generator = QuestionGenerator::new(provider.clone(), GeneratorConfig::default());

        let batch = generator.generate("  Factoring ").await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch.questions()[0].chapter, "Factoring");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].prompt.contains("for Factoring"));
        assert_eq!(seen[0].max_tokens, 4096);
        assert_eq!(seen[0].top_k, Some(40));
    }

    #[tokio::test]
    async fn blank_chapter_is_rejected_without_calling_provider() {
        let provider = Arc::new(CannedProvider::replying(REPLY));
        let generator = QuestionGenerator::new(provider.clone(), GeneratorConfig::default());

        let err = generator.generate("   ").await.unwrap_err();
        assert!(matches!(err, GenerationError::InvalidChapter));
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn extraction_failure_is_typed() {
        let provider = Arc::new(CannedProvider::replying("I cannot help with that."));
        let generator = QuestionGenerator::new(provider, GeneratorConfig::default());

        match generator.generate("Limits").await {
            Err(GenerationError::Extraction(e)) => {
                assert_eq!(e.kind(), ExtractionErrorKind::NoCandidateFound)
            }
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn provider_failure_is_wrapped() {
        let provider = Arc::new(CannedProvider {
            reply: Err(anyhow::anyhow!("network error: connection refused")),
            seen: Mutex::new(vec![]),
        });
        let generator = QuestionGenerator::new(provider, GeneratorConfig::default());

        let err = generator.generate("Limits").await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider(_)));
        assert!(err.to_string().contains("connection refused"));
    }
}
