//! Binary tests: run `wordex` as a subprocess against a temp store.

mod common;

use common::TestEnv;
use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};

fn wordex(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wordex"))
        .arg("--db")
        .arg(db)
        .args(args)
        .env_remove("WORDEX_DB")
        .output()
        .expect("Failed to run wordex")
}

fn json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "wordex failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

// ── check ───────────────────────────────────────────────────────────────────

#[test]
fn test_check_reports_without_persisting() {
    let env = TestEnv::new();
    env.write_file("notes.txt", "alpha beta alpha");
    let db = env.path("store/index.db");

    let output = wordex(
        &db,
        &["--json", "check", &env.path("notes.txt").to_string_lossy()],
    );
    let entry = json(&output);

    assert_eq!(entry["extension"], "txt");
    assert_eq!(entry["size"], 16);
    assert_eq!(entry["word_counts"]["alpha"], 2);
    assert!(!env.path("store").exists());
}

#[test]
fn test_check_text_output() {
    let env = TestEnv::new();
    env.write_file("notes.txt", "alpha beta alpha");
    let db = env.path("index.db");

    let output = wordex(&db, &["check", &env.path("notes.txt").to_string_lossy()]);
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("Unique words:    2"));
    assert!(text.contains("Top words:"));
}

#[test]
fn test_check_missing_file_fails() {
    let env = TestEnv::new();
    let output = wordex(
        &env.path("index.db"),
        &["check", &env.path("absent.txt").to_string_lossy()],
    );
    assert!(!output.status.success());
}

// ── index ───────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_root_leaves_store_untouched() {
    let env = TestEnv::new();
    let db = env.path("cache/wordex/file_index.db");

    for root in ["", "   "] {
        let output = wordex(&db, &["index", root]);
        assert!(!output.status.success());
    }
    let missing = env.path("missing").to_string_lossy().into_owned();
    assert!(!wordex(&db, &["index", &missing]).status.success());

    assert!(!env.path("cache").exists());
}

#[test]
fn test_index_then_path_query() {
    let env = TestEnv::new();
    env.write_file("docs/reports/q1.txt", "revenue grew");
    env.write_file("docs/notes.md", "meeting notes");
    let db = env.path("index.db");

    let root = env.path("docs").to_string_lossy().into_owned();
    let report = json(&wordex(&db, &["--json", "index", &root]));
    assert_eq!(report["files_processed"], 2);

    let hits = json(&wordex(&db, &["--json", "path", "reports/q1"]));
    let hits = hits.as_array().expect("array of entries");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["file_name"], "q1.txt");
    assert_eq!(hits[0]["word_counts"]["revenue"], 1);
}
