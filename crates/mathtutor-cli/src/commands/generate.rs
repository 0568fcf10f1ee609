//! The `mathtutor generate` command.

use std::path::PathBuf;

use anyhow::Result;

use mathtutor_core::generator::{GenerationError, QuestionGenerator};
use mathtutor_providers::config::load_config_from;

use super::{exit_with_extraction_error, print_batch, OutputFormat};

pub async fn execute(
    chapter: String,
    provider_name: Option<String>,
    model: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let format = OutputFormat::parse(&format)?;
    let config = load_config_from(config_path.as_deref())?;

    let provider = config.provider(provider_name.as_deref())?;
    let generator = QuestionGenerator::new(provider, config.generator_config(model.as_deref()));

    match generator.generate(&chapter).await {
        Ok(batch) => print_batch(&batch, format),
        Err(GenerationError::Extraction(e)) => exit_with_extraction_error(&e),
        Err(e) => Err(e.into()),
    }
}
