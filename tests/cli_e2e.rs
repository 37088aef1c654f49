//! End-to-end CLI tests for chatscrub.
//!
//! These tests verify the complete CLI workflow by running the actual binary
//! with various arguments and checking the output.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test cli_e2e
//! ```

#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::{tempdir, TempDir};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Creates a temporary workspace export with one channel and a dictionary.
fn setup_fixtures() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().expect("Failed to create temp dir");

    let export = dir.path().join("export");
    fs::create_dir_all(export.join("general")).unwrap();
    let day = r#"[
  {
    "client_msg_id": "a1",
    "ts": "1609459200",
    "user": "U01ABC",
    "type": "message",
    "text": "I'm happy!! 2 times",
    "blocks": [{
      "type": "rich_text",
      "elements": [{
        "type": "rich_text_section",
        "elements": [{"type": "text", "text": "I'm happy!! 2 times"}]
      }]
    }]
  },
  {"ts": "1609466400", "subtype": "channel_join", "type": "message"}
]"#;
    fs::write(export.join("general/2021-01-01.json"), day).unwrap();

    let dict = dir.path().join("liwc.csv");
    fs::write(&dict, "posemo,negemo\nhappy,sad\n").unwrap();

    (dir, export, dict)
}

fn chatscrub() -> Command {
    Command::cargo_bin("chatscrub").expect("binary exists")
}

// ============================================================================
// Basic functionality
// ============================================================================

#[test]
fn test_basic_run_succeeds() {
    let (dir, export, dict) = setup_fixtures();
    let out = dir.path().join("out");

    chatscrub()
        .arg(&export)
        .arg(&dict)
        .args(["--seed", "s1"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Done!"))
        .stdout(predicate::str::contains("Anonymized:     1 messages"))
        .stdout(predicate::str::contains("Not processed:  1 messages"));

    assert!(out.join("general/2021-01-01.json").exists());
    assert!(out.join("hash_registry.json").exists());
}

#[test]
fn test_parallel_flag() {
    let (dir, export, dict) = setup_fixtures();
    let out = dir.path().join("out");

    chatscrub()
        .arg(&export)
        .arg(&dict)
        .args(["--seed", "s1", "--parallel"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parallel"));
}

#[test]
fn test_output_contains_no_raw_text() {
    let (dir, export, dict) = setup_fixtures();
    let out = dir.path().join("out");

    chatscrub()
        .arg(&export)
        .arg(&dict)
        .args(["--seed", "s1"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let day = fs::read_to_string(out.join("general/2021-01-01.json")).unwrap();
    assert!(!day.contains("happy"));
    assert!(day.contains("SENT_END"));

    // raw tokens live only in the registry
    let registry = fs::read_to_string(out.join("hash_registry.json")).unwrap();
    assert!(registry.contains("happy"));
}

// ============================================================================
// Error handling
// ============================================================================

#[test]
fn test_missing_seed_fails() {
    let (_dir, export, dict) = setup_fixtures();

    chatscrub()
        .arg(&export)
        .arg(&dict)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--seed"));
}

#[test]
fn test_missing_workspace_fails() {
    let (dir, _export, dict) = setup_fixtures();

    chatscrub()
        .arg(dir.path().join("no_such_dir"))
        .arg(&dict)
        .args(["--seed", "s1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_empty_dictionary_fails() {
    let (dir, export, _dict) = setup_fixtures();
    let empty_dict = dir.path().join("empty.csv");
    fs::write(&empty_dict, "").unwrap();

    chatscrub()
        .arg(&export)
        .arg(&empty_dict)
        .args(["--seed", "s1"])
        .arg("-o")
        .arg(dir.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("dictionary"));
}

#[test]
fn test_help_lists_arguments() {
    chatscrub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--seed"))
        .stdout(predicate::str::contains("--parallel"));
}
