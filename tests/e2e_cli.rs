//! End-to-end tests for the `meanprop` binary.
//!
//! Each test writes its inputs to a temporary directory and checks exit
//! status, stdout and stderr. A failing run must leave stdout empty.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use meanprop::compare::{compare_text, DEFAULT_TOLERANCE};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/graph_data.txt");

fn meanprop(args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_meanprop"))
        .args(args)
        .env_remove("MEANPROP_OUT_DIM")
        .env_remove("MEANPROP_THRESHOLD")
        .env_remove("MEANPROP_CONFIG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).unwrap();
        }
    }
    child.wait_with_output().unwrap()
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn stdout(out: &Output) -> String {
    String::from_utf8(out.stdout.clone()).unwrap()
}

#[test]
fn test_run_with_out_dim_flag() {
    let out = meanprop(&["run", FIXTURE, "--out-dim", "4"], None);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Score = 5.84"));
    assert!(text.contains("Edge 4 (4, 0) | score = 19.72 | binary = 1"));
}

#[test]
fn test_run_reads_out_dim_from_stdin() {
    let prompted = meanprop(&["run", FIXTURE], Some("4\n"));
    let flagged = meanprop(&["run", FIXTURE, "--out-dim", "4"], None);
    assert!(prompted.status.success());
    assert_eq!(stdout(&prompted), stdout(&flagged));
    assert!(String::from_utf8_lossy(&prompted.stderr).contains("Enter output feature dimension"));
}

#[test]
fn test_run_json_format() {
    let out = meanprop(&["run", FIXTURE, "--out-dim", "2", "--format", "json"], None);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(value["edges"].as_array().unwrap().len(), 5);
}

#[test]
fn test_truncated_file_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let graph = write_file(
        dir.path(),
        "short.txt",
        "5 4\n0 1 1 1 1\n1 1 1 1 1\n2 1 1 1 1\n3 1 1 1 1\n",
    );
    let out = meanprop(&["run", graph.to_str().unwrap(), "--out-dim", "4"], None);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Format error"));
}

#[test]
fn test_weight_column_mismatch_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(
        dir.path(),
        "config.json",
        r#"{"weights": [[1.0, 1.0, 1.0]], "bias": [0.0]}"#,
    );
    let out = meanprop(&["run", FIXTURE, "--config", config.to_str().unwrap()], None);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Dimension error"));
}

#[test]
fn test_config_file_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_file(dir.path(), "config.json", r#"{"out_dim": 4, "threshold": 30.0}"#);
    let out = meanprop(&["run", FIXTURE, "--config", config.to_str().unwrap()], None);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Binary = 0"));
    assert!(text.contains("Edge 0 (0, 1) | score = 48.72 | binary = 1"));
    assert!(text.contains("Edge 1 (1, 2) | score = 25.20 | binary = 0"));
}

#[test]
fn test_compare_subcommand() {
    let dir = tempfile::tempdir().unwrap();
    let run = meanprop(&["run", FIXTURE, "--out-dim", "4"], None);
    let ours = stdout(&run);

    // Same numbers, other producer's layout and edge order.
    let mut lines: Vec<&str> = ours.lines().collect();
    let edge_start = lines.iter().position(|l| l.starts_with("Edge 0")).unwrap();
    lines[edge_start..].reverse();
    let theirs = lines.join("\n");
    compare_text(&ours, &theirs, DEFAULT_TOLERANCE).unwrap();

    let left = write_file(dir.path(), "left.txt", &ours);
    let right = write_file(dir.path(), "right.txt", &theirs);
    let out = meanprop(&["compare", left.to_str().unwrap(), right.to_str().unwrap()], None);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Outputs are consistent."));

    let wrong = write_file(dir.path(), "wrong.txt", &ours.replace("Score = 5.84", "Score = 5.90"));
    let out = meanprop(&["compare", left.to_str().unwrap(), wrong.to_str().unwrap()], None);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Outputs are DIFFERENT"));
}
