//! The `mathtutor init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("mathtutor.toml").exists() {
        println!("mathtutor.toml already exists, skipping.");
    } else {
        std::fs::write("mathtutor.toml", SAMPLE_CONFIG)?;
        println!("Created mathtutor.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or set api_key in mathtutor.toml)");
    println!("  2. Run: mathtutor generate --chapter \"Quadratic Equations\"");
    println!("  3. Run: mathtutor ask \"How do I complete the square?\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# mathtutor configuration

default_provider = "gemini"
default_model = "gemini-1.5-flash"
temperature = 0.2
max_output_tokens = 4096
tutor_max_output_tokens = 800

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

# Offline provider that replies with a fixed text (or the contents of response_file).
[providers.offline]
type = "mock"
response = "[]"

[question_mix]
easy = 2
medium = 2
hard = 1
"#;
