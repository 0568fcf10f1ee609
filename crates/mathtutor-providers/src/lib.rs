//! mathtutor-providers — Generative-language provider integrations.
//!
//! Implements the `LlmProvider` trait for the Gemini `generateContent` API
//! and for an offline mock, plus the TOML configuration that selects them.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;

pub use config::{create_provider, load_config, MathtutorConfig, ProviderConfig};
pub use error::ProviderError;
