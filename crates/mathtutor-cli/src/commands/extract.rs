//! The `mathtutor extract` command.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{exit_with_extraction_error, print_batch, OutputFormat};

pub fn execute(input: PathBuf, chapter: String, format: String) -> Result<()> {
    let format = OutputFormat::parse(&format)?;

    let raw = if input.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read model output from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&input)
            .with_context(|| format!("failed to read model output: {}", input.display()))?
    };

    match mathtutor_core::extract(&raw, &chapter) {
        Ok(batch) => print_batch(&batch, format),
        Err(e) => exit_with_extraction_error(&e),
    }
}
