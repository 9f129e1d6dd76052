//! CLI smoke tests for the `bril-ssa` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn bril_ssa_cmd() -> Command {
    Command::cargo_bin("bril-ssa").unwrap()
}

const STRAIGHT_LINE: &str = r#"{
  "functions": [
    {
      "name": "main",
      "instrs": [
        {"op": "const", "dest": "x", "type": "int", "value": 1},
        {"op": "add", "dest": "y", "type": "int", "args": ["x", "x"]},
        {"op": "print", "args": ["y"]}
      ]
    }
  ]
}"#;

const DIAMOND: &str = r#"{
  "functions": [
    {
      "name": "main",
      "instrs": [
        {"op": "const", "dest": "cond", "type": "bool", "value": true},
        {"op": "br", "args": ["cond"], "labels": ["b1", "b2"]},
        {"label": "b1"},
        {"op": "const", "dest": "x", "type": "int", "value": 1},
        {"op": "jmp", "labels": ["b3"]},
        {"label": "b2"},
        {"op": "const", "dest": "x", "type": "int", "value": 2},
        {"op": "jmp", "labels": ["b3"]},
        {"label": "b3"},
        {"op": "print", "args": ["x"]},
        {"op": "ret"}
      ]
    }
  ]
}"#;

const MALFORMED: &str = r#"{"functions": [{"name": "main", "instrs": [{"op": "frobnicate", "dest": "x", "type": "int"}]}]}"#;

#[test]
fn converts_a_straight_line_program_to_ssa() {
    bril_ssa_cmd()
        .write_stdin(STRAIGHT_LINE)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"x.1\""))
        .stdout(predicate::str::contains("\"y.1\""));
}

#[test]
fn converts_a_diamond_program_and_emits_a_phi() {
    bril_ssa_cmd()
        .write_stdin(DIAMOND)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"phi\""));
}

#[test]
fn compact_flag_produces_single_line_json() {
    let output = bril_ssa_cmd()
        .arg("--compact")
        .write_stdin(STRAIGHT_LINE)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    assert_eq!(text.trim().lines().count(), 1);
}

#[test]
fn malformed_instruction_exits_nonzero() {
    bril_ssa_cmd()
        .write_stdin(MALFORMED)
        .assert()
        .failure();
}

#[test]
fn writes_output_to_a_file_when_requested() {
    let dir = std::env::temp_dir().join(format!("bril-ssa-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let out_path = dir.join("out.json");

    bril_ssa_cmd()
        .arg("--output")
        .arg(&out_path)
        .write_stdin(STRAIGHT_LINE)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.contains("x.1"));
    std::fs::remove_dir_all(&dir).ok();
}
