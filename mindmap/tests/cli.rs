//! CLI tests for the file-based `mindmap` subcommands.
//!
//! Spawns the mindmap binary in a temp dir and verifies exit codes and the
//! artifacts it writes.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use mindmap::exit_codes;
use mindmap::graph::ROOT_ID;
use mindmap::io::config::{MindmapConfig, load_config};
use mindmap::test_support::session;

/// Exported text of `Trip -> {Packing -> {Socks}, Tickets}`.
fn trip_document() -> String {
    let mut s = session();
    s.set_label(ROOT_ID, "Trip").expect("label root");
    s.select(ROOT_ID).expect("select root");
    let packing = s.insert_child().expect("packing");
    let tickets = s.insert_child().expect("tickets");
    s.select(&packing).expect("select packing");
    let socks = s.insert_child().expect("socks");
    s.set_label(&packing, "Packing").expect("label");
    s.set_label(&tickets, "Tickets").expect("label");
    s.set_label(&socks, "Socks").expect("label");
    s.export_text().expect("export")
}

fn run_mindmap(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mindmap"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("run mindmap")
}

#[test]
fn csv_writes_outline_into_out_dir() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("trip.json"), trip_document()).expect("write input");

    let output = run_mindmap(
        temp.path(),
        &["csv", "--input", "trip.json", "--out-dir", "out"],
    );

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let csv = fs::read_to_string(temp.path().join("out").join("mindmap.csv")).expect("read csv");
    assert_eq!(
        csv,
        "\u{feff}\"Level 1\",\"Level 2\",\"Level 3\"\n\
         \"Trip\",\"Packing\",\"Socks\"\n\
         \"\",\"Tickets\",\"\"\n"
    );
}

#[test]
fn csv_of_default_mindmap_exits_with_empty_export_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let pristine = session().export_text().expect("export");
    fs::write(temp.path().join("empty.json"), pristine).expect("write input");

    let output = run_mindmap(temp.path(), &["csv", "--input", "empty.json"]);

    assert_eq!(output.status.code(), Some(exit_codes::EMPTY_EXPORT));
    assert!(!temp.path().join("mindmap.csv").exists());
}

#[test]
fn validate_accepts_export_and_rejects_garbage() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("trip.json"), trip_document()).expect("write input");
    fs::write(temp.path().join("bad.json"), "{\"nodes\": 3}").expect("write input");
    fs::write(temp.path().join("blank.json"), "  \n").expect("write input");

    let ok = run_mindmap(temp.path(), &["validate", "--input", "trip.json"]);
    assert_eq!(ok.status.code(), Some(exit_codes::OK));
    assert!(String::from_utf8_lossy(&ok.stdout).contains("4 node(s), horizontal"));

    let bad = run_mindmap(temp.path(), &["validate", "--input", "bad.json"]);
    assert_eq!(bad.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&bad.stderr).contains("malformed mindmap data"));

    let blank = run_mindmap(temp.path(), &["validate", "--input", "blank.json"]);
    assert_eq!(blank.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&blank.stderr).contains("nothing to import"));
}

#[test]
fn layout_prints_one_position_per_node() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("trip.json"), trip_document()).expect("write input");

    let output = run_mindmap(temp.path(), &["layout", "--input", "trip.json"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let nodes: serde_json::Value = serde_json::from_slice(&output.stdout).expect("layout json");
    let nodes = nodes.as_array().expect("array");
    assert_eq!(nodes.len(), 4);
    assert!(nodes.iter().all(|node| node["position"]["x"].is_number()));
}

#[test]
fn init_config_refuses_to_overwrite_without_force() {
    let temp = tempfile::tempdir().expect("tempdir");

    let first = run_mindmap(temp.path(), &["init-config", "mindmap.toml"]);
    assert_eq!(first.status.code(), Some(exit_codes::OK));
    let cfg = load_config(&temp.path().join("mindmap.toml")).expect("load");
    assert_eq!(cfg, MindmapConfig::default());

    let second = run_mindmap(temp.path(), &["init-config", "mindmap.toml"]);
    assert_eq!(second.status.code(), Some(exit_codes::INVALID));

    let forced = run_mindmap(temp.path(), &["init-config", "mindmap.toml", "--force"]);
    assert_eq!(forced.status.code(), Some(exit_codes::OK));
}

#[test]
fn edit_runs_scripted_session_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("trip.json"), trip_document()).expect("write input");

    let mut child = Command::new(env!("CARGO_BIN_EXE_mindmap"))
        .current_dir(temp.path())
        .args(["edit", "--input", "trip.json", "--out-dir", "out"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn mindmap edit");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(b"select 1\nF2\nVacation\ncsv\nquit\n")
        .expect("write script");
    let output = child.wait_with_output().expect("wait");

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let csv = fs::read_to_string(temp.path().join("out").join("mindmap.csv")).expect("read csv");
    assert!(csv.contains("\"Vacation\",\"Packing\",\"Socks\""));
}
