//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VALID_REPLY: &str = r#"Sure! Here are your questions:

```json
[
  {
    "question": "Solve for x: 2x + 5 = 15",
    "options": [
      {"id": "a", "text": "x = 5"},
      {"id": "b", "text": "x = 10"},
      {"id": "c", "text": "x = 7.5"},
      {"id": "d", "text": "x = 6"}
    ],
    "correctAnswer": "a",
    "explanation": "Subtract 5 from both sides, then divide by 2.",
    "difficulty": "Easy",
    "subject": "Algebra"
  },
  {
    "question": "Find the area of a circle with radius 6",
    "options": [
      {"id": "a", "text": "36π"},
      {"id": "b", "text": "12π"},
      {"id": "c", "text": "18π"},
      {"id": "d", "text": "24π"}
    ],
    "correctAnswer": "a",
    "explanation": "Area = πr² = 36π.",
    "difficulty": "Medium"
  }
]
```
"#;

fn mathtutor() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("mathtutor").unwrap();
    cmd.env_remove("GEMINI_API_KEY").env("RUST_LOG", "off");
    cmd
}

/// Write a config whose default provider is a mock replying with `reply`.
fn mock_config(dir: &Path, reply: &str) -> PathBuf {
    let reply_path = dir.join("reply.txt");
    std::fs::write(&reply_path, reply).unwrap();

    let config = format!(
        "default_provider = \"offline\"\n\n[providers.offline]\ntype = \"mock\"\nresponse_file = '{}'\n",
        reply_path.display()
    );
    let config_path = dir.join("mathtutor.toml");
    std::fs::write(&config_path, config).unwrap();
    config_path
}

#[test]
fn extract_from_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reply.txt");
    std::fs::write(&input, VALID_REPLY).unwrap();

    let output = mathtutor()
        .arg("extract")
        .arg("--input")
        .arg(&input)
        .arg("--chapter")
        .arg("Linear Equations")
        .output()
        .unwrap();
    assert!(output.status.success());

    let batch: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let questions = batch.as_array().unwrap();
    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0]["id"], 1);
    assert_eq!(questions[1]["id"], 2);
    assert_eq!(questions[1]["subject"], "Mathematics");
    assert_eq!(questions[1]["chapter"], "Linear Equations");
    assert_eq!(questions[0]["correctAnswer"], "a");
}

#[test]
fn extract_from_stdin_as_table() {
    mathtutor()
        .arg("extract")
        .arg("--chapter")
        .arg("Geometry")
        .arg("--format")
        .arg("table")
        .write_stdin(VALID_REPLY)
        .assert()
        .success()
        .stdout(predicate::str::contains("Difficulty"))
        .stdout(predicate::str::contains("Find the area of a circle"));
}

#[test]
fn extract_without_json_reports_no_candidate() {
    mathtutor()
        .arg("extract")
        .arg("--chapter")
        .arg("Algebra")
        .write_stdin("no json here")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"kind\": \"no_candidate_found\""));
}

#[test]
fn extract_empty_array_reports_empty_batch() {
    mathtutor()
        .arg("extract")
        .arg("--chapter")
        .arg("Algebra")
        .write_stdin("[]")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"kind\": \"empty_batch\""));
}

#[test]
fn extract_dangling_answer_reports_index() {
    let reply = VALID_REPLY.replacen("\"correctAnswer\": \"a\",\n    \"explanation\": \"Area", "\"correctAnswer\": \"e\",\n    \"explanation\": \"Area", 1);
    assert_ne!(reply, VALID_REPLY);

    mathtutor()
        .arg("extract")
        .arg("--chapter")
        .arg("Algebra")
        .write_stdin(reply)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"kind\": \"malformed\""))
        .stdout(predicate::str::contains("\"offending_index\": 1"));
}

#[test]
fn extract_rejects_unknown_format() {
    mathtutor()
        .arg("extract")
        .arg("--chapter")
        .arg("Algebra")
        .arg("--format")
        .arg("yaml")
        .write_stdin("[]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn extract_missing_input_file() {
    mathtutor()
        .arg("extract")
        .arg("--input")
        .arg("nonexistent.txt")
        .arg("--chapter")
        .arg("Algebra")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn generate_with_mock_provider() {
    let dir = TempDir::new().unwrap();
    let config = mock_config(dir.path(), VALID_REPLY);

    let output = mathtutor()
        .arg("generate")
        .arg("--chapter")
        .arg("Circles")
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let batch: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(batch.as_array().unwrap().len(), 2);
    assert_eq!(batch[1]["chapter"], "Circles");
}

#[test]
fn generate_with_unusable_reply_exits_with_report() {
    let dir = TempDir::new().unwrap();
    let config = mock_config(dir.path(), "I'd rather not.");

    mathtutor()
        .arg("generate")
        .arg("--chapter")
        .arg("Circles")
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("no_candidate_found"));
}

#[test]
fn generate_blank_chapter_fails() {
    let dir = TempDir::new().unwrap();
    let config = mock_config(dir.path(), VALID_REPLY);

    mathtutor()
        .arg("generate")
        .arg("--chapter")
        .arg("  ")
        .arg("--config")
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid chapter"));
}

#[test]
fn generate_unknown_provider_fails() {
    let dir = TempDir::new().unwrap();
    let config = mock_config(dir.path(), VALID_REPLY);

    mathtutor()
        .arg("generate")
        .arg("--chapter")
        .arg("Circles")
        .arg("--provider")
        .arg("nowhere")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found in config"));
}

#[test]
fn ask_with_mock_provider() {
    let dir = TempDir::new().unwrap();
    let config = mock_config(dir.path(), "Step 1: Move the constant.\nStep 2: Divide.\n");

    mathtutor()
        .arg("ask")
        .arg("How do I solve 2x + 5 = 15?")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 2: Divide."));
}

#[test]
fn list_models_from_config() {
    let dir = TempDir::new().unwrap();
    let config = mock_config(dir.path(), "[]");

    mathtutor()
        .arg("list-models")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Provider: offline"))
        .stdout(predicate::str::contains("mock-model"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    mathtutor()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created mathtutor.toml"));

    assert!(dir.path().join("mathtutor.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    mathtutor()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    mathtutor()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
