//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mathtutor_core::generator::GeneratorConfig;
use mathtutor_core::prompt::QuestionMix;
use mathtutor_core::traits::LlmProvider;
use mathtutor_core::tutor::TutorConfig;

use crate::gemini::GeminiProvider;
use crate::mock::MockProvider;

/// Configuration for a single provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    /// Canned replies, for offline runs and tests.
    Mock {
        #[serde(default)]
        response: Option<String>,
        #[serde(default)]
        response_file: Option<PathBuf>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock {
                response,
                response_file,
            } => f
                .debug_struct("Mock")
                .field("response", response)
                .field("response_file", response_file)
                .finish(),
        }
    }
}

/// Top-level mathtutor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MathtutorConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Max output tokens for question generation.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Max output tokens for tutor answers.
    #[serde(default = "default_tutor_max_output_tokens")]
    pub tutor_max_output_tokens: u32,
    /// Questions requested per difficulty.
    #[serde(default)]
    pub question_mix: QuestionMix,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}
fn default_temperature() -> f64 {
    0.2
}
fn default_max_output_tokens() -> u32 {
    4096
}
fn default_tutor_max_output_tokens() -> u32 {
    800
}

impl Default for MathtutorConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            tutor_max_output_tokens: default_tutor_max_output_tokens(),
            question_mix: QuestionMix::default(),
        }
    }
}

impl MathtutorConfig {
    /// Generator settings for `model` (or the default model).
    pub fn generator_config(&self, model: Option<&str>) -> GeneratorConfig {
        GeneratorConfig {
            model: model.unwrap_or(&self.default_model).to_string(),
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
            mix: self.question_mix,
            ..GeneratorConfig::default()
        }
    }

    /// Tutor settings for `model` (or the default model).
    pub fn tutor_config(&self, model: Option<&str>) -> TutorConfig {
        TutorConfig {
            model: model.unwrap_or(&self.default_model).to_string(),
            temperature: self.temperature,
            max_tokens: self.tutor_max_output_tokens,
        }
    }

    /// Build the named provider, or the default one.
    pub fn provider(&self, name: Option<&str>) -> Result<Arc<dyn LlmProvider>> {
        let name = name.unwrap_or(&self.default_provider);
        let Some(pconfig) = self.providers.get(name) else {
            anyhow::bail!(
                "provider '{}' not found in config. Available: {:?}",
                name,
                self.providers.keys().collect::<Vec<_>>()
            );
        };
        Ok(Arc::from(create_provider(name, pconfig)?))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Mock { .. } => config.clone(),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mathtutor.toml` in the current directory
/// 2. `~/.config/mathtutor/config.toml`
///
/// Environment variable override: `GEMINI_API_KEY`.
pub fn load_config() -> Result<MathtutorConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MathtutorConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("mathtutor.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => MathtutorConfig::default(),
    };

    // Apply env var override
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        match config.providers.get_mut("gemini") {
            Some(ProviderConfig::Gemini { api_key, .. }) => *api_key = key,
            Some(ProviderConfig::Mock { .. }) => {
                tracing::warn!("GEMINI_API_KEY set but provider 'gemini' is a mock; ignoring")
            }
            None => {
                config.providers.insert(
                    "gemini".into(),
                    ProviderConfig::Gemini {
                        api_key: key,
                        base_url: None,
                    },
                );
            }
        }
    }

    // Resolve env vars in all provider configs
    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config(content: &str) -> Result<MathtutorConfig> {
    Ok(toml::from_str::<MathtutorConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("mathtutor"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            if api_key.trim().is_empty() {
                anyhow::bail!(
                    "provider '{name}' has no API key. Set GEMINI_API_KEY or api_key in the config"
                );
            }
            Ok(Box::new(GeminiProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::Mock {
            response,
            response_file,
        } => {
            let text = match (response, response_file) {
                (_, Some(file)) => std::fs::read_to_string(file).with_context(|| {
                    format!("failed to read mock response: {}", file.display())
                })?,
                (Some(text), None) => text.clone(),
                (None, None) => "[]".to_string(),
            };
            Ok(Box::new(MockProvider::with_fixed_response(&text)))
        }
    }
}
