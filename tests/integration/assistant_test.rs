//! Integration tests for the prompt and fix commands
//!
//! The assistant is optional: without one, `fix` must fail cleanly instead of
//! crashing, and `prompt` must always work.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FINDING: &str = r#"[
  {
    "rule": "NP_NULL_ON_SOME_PATH",
    "category": "CORRECTNESS",
    "message": "Possible null pointer dereference",
    "severity": 1,
    "location": { "path": "com/acme/Foo.java", "file": "Foo.java", "line": 3 },
    "method": "load"
  }
]"#;

/// Helper to create findtask command in a directory
fn findtask_in(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("findtask").unwrap();
    cmd.current_dir(dir).env("HOME", dir).env("NO_COLOR", "1").env("CLICOLOR", "0");
    cmd
}

fn setup_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("findings.json"), FINDING).unwrap();
    let src = temp.path().join("src/main/java/com/acme");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("Foo.java"), "class Foo {\n  Object load() {\n    return cache.get();\n  }\n}\n")
        .unwrap();
    temp
}

/// Test prompt includes the finding and its code context
#[test]
fn test_prompt_with_code_context() {
    let temp = setup_project();

    findtask_in(temp.path())
        .args(["prompt", "findings.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fix the following SpotBugs issue in my code."))
        .stdout(predicate::str::contains("**Method:** `load`"))
        .stdout(predicate::str::contains("```java\nclass Foo {"));
}

/// Test prompt with a bad index
#[test]
fn test_prompt_index_out_of_range() {
    let temp = setup_project();

    findtask_in(temp.path())
        .args(["prompt", "findings.json", "--index", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No finding #2"));
}

/// Test fix without an assistant fails without crashing
#[test]
fn test_fix_without_assistant() {
    let temp = setup_project();

    findtask_in(temp.path())
        .args(["fix", "findings.json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Assistant is not available"))
        .stderr(predicate::str::contains("Prompt was not delivered"));
}

/// Test fix hands the prompt to the configured command
#[cfg(unix)]
#[test]
fn test_fix_with_command_assistant() {
    let temp = setup_project();
    let received = temp.path().join("received.txt");
    fs::write(
        temp.path().join(".findtask.toml"),
        format!(
            "[assistant]\ncommand = [\"/bin/sh\", \"-c\", \"cat > '{}'\"]\n",
            received.display()
        ),
    )
    .unwrap();

    findtask_in(temp.path())
        .args(["--json", "fix", "findings.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sent\": true"));

    let prompt = fs::read_to_string(&received).unwrap();
    assert!(prompt.contains("**Bug:** NP_NULL_ON_SOME_PATH"));
}
