//! CLI tests for the `lp` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

// Nothing listens on the discard port, so every model call fails fast
const UNREACHABLE_CONFIG: &str = "\
llm:
  api-key-env: LP_CLI_TEST_KEY
  base-url: http://127.0.0.1:9
  timeout-ms: 2000
  max-retries: 0
generation:
  call-timeout-ms: 5000
";

#[test]
fn test_generate_failure_reports_plain_error() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("learnpath.yml");
    fs::write(&config, UNREACHABLE_CONFIG).unwrap();

    Command::cargo_bin("lp")
        .unwrap()
        .env("LP_CLI_TEST_KEY", "test-key")
        .env("XDG_DATA_HOME", temp.path())
        .env("CLICOLOR_FORCE", "1")
        .args(["-c", config.to_str().unwrap(), "generate", "learn", "Rust"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"status\": \"error\""))
        .stderr(predicate::str::contains("Error: Generation failed"));
}

#[test]
fn test_render_prints_flowchart() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("path.json");
    fs::write(&file, r#"{"title": "SQL", "topics": [{"name": "Joins"}]}"#).unwrap();

    Command::cargo_bin("lp")
        .unwrap()
        .env("XDG_DATA_HOME", temp.path())
        .args(["render", file.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph TD"))
        .stdout(predicate::str::contains("Joins"));
}
