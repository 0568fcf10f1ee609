//! Subcommand implementations and shared output helpers.

pub mod ask;
pub mod extract;
pub mod generate;
pub mod init;
pub mod list_models;

use anyhow::Result;
use comfy_table::{Cell, Table};

use mathtutor_core::{ExtractionError, QuestionBatch};

/// Exit status used when model output could not be turned into a batch.
pub const EXTRACTION_FAILED_EXIT: i32 = 2;

/// Output format for question batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => anyhow::bail!("unknown format: '{other}' (expected json or table)"),
        }
    }
}

pub fn print_batch(batch: &QuestionBatch, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(batch)?),
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_header(vec![
                "#",
                "Difficulty",
                "Subject",
                "Question",
                "Options",
                "Answer",
            ]);
            for q in batch {
                let options = q
                    .options
                    .iter()
                    .map(|o| format!("{}. {}", o.id, o.text))
                    .collect::<Vec<_>>()
                    .join("\n");
                table.add_row(vec![
                    Cell::new(q.id),
                    Cell::new(q.difficulty),
                    Cell::new(&q.subject),
                    Cell::new(&q.question),
                    Cell::new(options),
                    Cell::new(&q.correct_answer),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

/// Print the machine-readable error report and exit.
pub fn exit_with_extraction_error(err: &ExtractionError) -> ! {
    match serde_json::to_string_pretty(&err.report()) {
        Ok(json) => println!("{json}"),
        Err(_) => println!("{err}"),
    }
    eprintln!("Error: {err}");
    std::process::exit(EXTRACTION_FAILED_EXIT);
}
