//! mathtutor CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "mathtutor",
    version,
    about = "Generate and validate math practice questions with a generative model"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a validated question batch from raw model output
    Extract {
        /// File holding the model output ("-" for stdin)
        #[arg(long, default_value = "-")]
        input: PathBuf,

        /// Chapter used for entries that don't name one
        #[arg(long)]
        chapter: String,

        /// Output format: json, table
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Generate practice questions for a chapter
    Generate {
        /// Chapter to generate questions for (e.g. "Quadratic Equations")
        #[arg(long)]
        chapter: String,

        /// Provider name from the config
        #[arg(long)]
        provider: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Output format: json, table
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Ask the tutor a math question
    Ask {
        /// The question to ask
        question: String,

        /// Provider name from the config
        #[arg(long)]
        provider: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mathtutor=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            chapter,
            format,
        } => commands::extract::execute(input, chapter, format),
        Commands::Generate {
            chapter,
            provider,
            model,
            format,
            config,
        } => commands::generate::execute(chapter, provider, model, format, config).await,
        Commands::Ask {
            question,
            provider,
            model,
            config,
        } => commands::ask::execute(question, provider, model, config).await,
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
