use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::{Value, json};

fn fixture(name: &str) -> &'static str {
    match name {
        "pets" => include_str!("../tests/fixtures/pets.json"),
        _ => panic!("unknown fixture {}", name),
    }
}

#[test]
fn run_with_defaults_merges_known_answers() {
    let temp = TempDir::new().expect("temp dir");
    let spec = temp.child("pets.json");
    spec.write_str(fixture("pets")).expect("write spec");
    let answers = temp.child("known.json");
    answers
        .write_str(r#"{ "firstName": "Kristian", "age": 32 }"#)
        .expect("write answers");

    let output = Command::cargo_bin("multi-prompt")
        .expect("binary")
        .args(["run", "--defaults", "--spec"])
        .arg(spec.path())
        .arg("--answers")
        .arg(answers.path())
        .output()
        .expect("run");
    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(
        result,
        json!({ "firstName": "Kristian", "age": 32, "type": "tiger" })
    );
}

#[test]
fn run_without_known_answers_uses_every_default() {
    let temp = TempDir::new().expect("temp dir");
    let spec = temp.child("pets.json");
    spec.write_str(fixture("pets")).expect("write spec");

    let output = Command::cargo_bin("multi-prompt")
        .expect("binary")
        .args(["run", "--defaults", "--pretty", "--spec"])
        .arg(spec.path())
        .output()
        .expect("run");
    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(result, json!({ "firstName": "Kristian", "type": "tiger" }));
}

#[test]
fn run_rejects_non_object_answers() {
    let temp = TempDir::new().expect("temp dir");
    let spec = temp.child("pets.json");
    spec.write_str(fixture("pets")).expect("write spec");
    let answers = temp.child("known.json");
    answers.write_str("[1, 2]").expect("write answers");

    Command::cargo_bin("multi-prompt")
        .expect("binary")
        .args(["run", "--defaults", "--spec"])
        .arg(spec.path())
        .arg("--answers")
        .arg(answers.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("answers must be a JSON object"));
}

#[test]
fn run_fails_on_missing_section() {
    let temp = TempDir::new().expect("temp dir");
    let spec = temp.child("broken.json");
    spec.write_str(r#"{ "flow": ["ghost"], "sections": {} }"#)
        .expect("write spec");

    Command::cargo_bin("multi-prompt")
        .expect("binary")
        .args(["run", "--defaults", "--spec"])
        .arg(spec.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "flow ghost has no matching prompt section",
        ));
}

#[test]
fn run_reports_unreadable_spec_path() {
    let temp = TempDir::new().expect("temp dir");
    let missing = temp.child("missing.json");

    Command::cargo_bin("multi-prompt")
        .expect("binary")
        .args(["run", "--defaults", "--spec"])
        .arg(missing.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: failed to read").and(
            predicate::str::contains("missing.json"),
        ));
}

#[test]
fn validate_lists_every_problem() {
    let temp = TempDir::new().expect("temp dir");
    let spec = temp.child("broken.json");
    spec.write_str(r#"{ "flow": ["ghost", "empty"], "sections": { "empty": {} } }"#)
        .expect("write spec");

    Command::cargo_bin("multi-prompt")
        .expect("binary")
        .args(["validate", "--spec"])
        .arg(spec.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("flow ghost has no matching prompt section"))
        .stdout(predicate::str::contains("section empty has no prompt function"));
}

#[test]
fn validate_accepts_fixture() {
    let temp = TempDir::new().expect("temp dir");
    let spec = temp.child("pets.json");
    spec.write_str(fixture("pets")).expect("write spec");

    Command::cargo_bin("multi-prompt")
        .expect("binary")
        .args(["validate", "--spec"])
        .arg(spec.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("first -> second"));
}

#[test]
fn schema_prints_document_schema() {
    let output = Command::cargo_bin("multi-prompt")
        .expect("binary")
        .arg("schema")
        .output()
        .expect("run");
    assert!(output.status.success());
    let schema: Value = serde_json::from_slice(&output.stdout).expect("schema json");
    assert!(schema["properties"]["flow"].is_object());
}
