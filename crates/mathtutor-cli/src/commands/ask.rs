//! The `mathtutor ask` command.

use std::path::PathBuf;

use anyhow::Result;

use mathtutor_core::tutor::Tutor;
use mathtutor_providers::config::load_config_from;

pub async fn execute(
    question: String,
    provider_name: Option<String>,
    model: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let provider = config.provider(provider_name.as_deref())?;
    let tutor = Tutor::new(provider, config.tutor_config(model.as_deref()));

    let answer = tutor.ask(&question).await?;
    println!("{}", answer.answer.trim_end());

    Ok(())
}
