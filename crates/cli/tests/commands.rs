//! End-to-end tests for the `serial-label` subcommands.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use assert_cmd::cargo;

const DATASET_CSV: &str = "\
SL.From,SL.End,P/N,P/R,QTY,Template
CDL2349-100,CDL2349-200,CZ9000A,03,5,
CDL2349-300,CDL2349-400,,,,3
";

fn label_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("serial-label"));
    cmd.current_dir(dir);
    cmd
}

fn workspace() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let data = dir.path().join("ranges.csv");
    fs::write(&data, DATASET_CSV).expect("write dataset");
    (dir, data)
}

fn json_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("valid json output")
}

#[test]
fn lookup_found_reports_fields_and_template() {
    let (dir, data) = workspace();
    let output = label_cmd(dir.path())
        .args(["lookup", "CDL2349-150", "--data"])
        .arg(&data)
        .args(["--output", "json"])
        .output()
        .expect("run lookup");

    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["match_count"], 1);
    assert_eq!(json["result"]["status"], "found");
    assert_eq!(json["result"]["key"], 150);
    assert_eq!(json["fields"]["part_number"], "CZ9000A");
    assert_eq!(json["fields"]["revision"], "03");
    assert_eq!(json["fields"]["description"], "SCB CCA");
    assert_eq!(json["fields"]["serial"], "CDL2349-150");
}

#[test]
fn lookup_uses_row_template() {
    let (dir, data) = workspace();
    let output = label_cmd(dir.path())
        .args(["lookup", "CDL2349-350", "--data"])
        .arg(&data)
        .args(["--output", "json"])
        .output()
        .expect("run lookup");

    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["template"], 3);
    assert_eq!(json["fields"]["part_number"], "CZ5S1000B");
}

#[test]
fn lookup_not_found_exits_nonzero() {
    let (dir, data) = workspace();
    let output = label_cmd(dir.path())
        .args(["lookup", "CDL2349-250", "--data"])
        .arg(&data)
        .args(["--output", "json"])
        .output()
        .expect("run lookup");

    assert!(!output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["success"], false);
    assert_eq!(json["result"]["status"], "not_found");
    assert_eq!(json["result"]["key"], 250);
}

#[test]
fn lookup_pretty_output_is_text() {
    let (dir, data) = workspace();
    let output = label_cmd(dir.path())
        .args(["lookup", "CDL2349-150", "--data"])
        .arg(&data)
        .args(["--output", "pretty"])
        .output()
        .expect("run lookup");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("found: key 150"), "stdout: {stdout}");
    assert!(stdout.contains("CZ9000A"));
    assert!(stdout.contains("1 (P/D text, P/N barcode"), "stdout: {stdout}");
}

#[test]
fn columns_shows_resolved_aliases() {
    let (dir, data) = workspace();
    let output = label_cmd(dir.path())
        .args(["columns", "--data"])
        .arg(&data)
        .args(["--output", "json"])
        .output()
        .expect("run columns");

    assert!(output.status.success());
    let json = json_stdout(&output);
    assert_eq!(json["rows"], 2);
    assert_eq!(json["resolved"]["range_from"], "SL.From");
    assert_eq!(json["resolved"]["range_to"], "SL.End");
    assert_eq!(json["resolved"]["quantity"], "QTY");
    assert!(json["resolved"]["description"].is_null());
}

#[test]
fn render_writes_png_and_zpl() {
    let (dir, data) = workspace();
    let png = dir.path().join("label.png");
    let zpl = dir.path().join("label.zpl");
    let output = label_cmd(dir.path())
        .args(["render", "CDL2349-150", "--data"])
        .arg(&data)
        .arg("--png")
        .arg(&png)
        .arg("--zpl")
        .arg(&zpl)
        .args(["--template", "1", "--output", "json"])
        .output()
        .expect("run render");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json = json_stdout(&output);
    assert_eq!(json["template"], 1);
    assert_eq!(json["outputs"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["reports"]["zpl"]["fields"]["serial"]["outcome"], "rendered");

    let bytes = fs::read(&png).expect("png written");
    assert!(bytes.starts_with(b"\x89PNG"));
    let doc = fs::read_to_string(&zpl).expect("zpl written");
    assert!(doc.starts_with("^XA"));
    assert!(doc.contains("^BCN"));
    assert!(doc.contains("^FDCZ9000A^FS"));
}

#[test]
fn render_without_serial_uses_sample() {
    let dir = tempfile::tempdir().expect("tempdir");
    let zpl = dir.path().join("sample.zpl");
    let output = label_cmd(dir.path())
        .arg("render")
        .arg("--zpl")
        .arg(&zpl)
        .args(["--output", "json"])
        .output()
        .expect("run render");

    assert!(output.status.success());
    assert_eq!(json_stdout(&output)["serial"], "CDL2349-1195");
    let doc = fs::read_to_string(&zpl).expect("zpl written");
    assert!(doc.contains("CDL2349-1195"));
}

#[test]
fn render_unknown_serial_fails() {
    let (dir, data) = workspace();
    let zpl = dir.path().join("label.zpl");
    let output = label_cmd(dir.path())
        .args(["render", "CDL2349-999", "--data"])
        .arg(&data)
        .arg("--zpl")
        .arg(&zpl)
        .args(["--output", "json"])
        .output()
        .expect("run render");

    assert!(!output.status.success());
    assert_eq!(json_stdout(&output)["status"], "not_found");
    assert!(!zpl.exists());
}

#[test]
fn print_to_file_appends_copies() {
    let (dir, data) = workspace();
    let out = dir.path().join("spool.zpl");
    let output = label_cmd(dir.path())
        .args(["print", "CDL2349-120", "--data"])
        .arg(&data)
        .arg("--file")
        .arg(&out)
        .args(["--copies", "2", "--output", "json"])
        .output()
        .expect("run print");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(json_stdout(&output)["copies"], 2);
    let doc = fs::read_to_string(&out).expect("spool written");
    assert_eq!(doc.matches("^XA").count(), 2);
    assert_eq!(doc.matches("^XZ").count(), 2);

    let again = label_cmd(dir.path())
        .args(["print", "CDL2349-130", "--data"])
        .arg(&data)
        .arg("--file")
        .arg(&out)
        .args(["--output", "json"])
        .output()
        .expect("run print");
    assert!(again.status.success());
    let doc = fs::read_to_string(&out).expect("spool written");
    assert_eq!(doc.matches("^XA").count(), 3);
    assert!(doc.contains("CDL2349-120") && doc.contains("CDL2349-130"));

    let replaced = label_cmd(dir.path())
        .args(["print", "CDL2349-140", "--data"])
        .arg(&data)
        .arg("--file")
        .arg(&out)
        .args(["--overwrite", "--output", "json"])
        .output()
        .expect("run print");
    assert!(replaced.status.success());
    let doc = fs::read_to_string(&out).expect("spool written");
    assert_eq!(doc.matches("^XA").count(), 1);
    assert!(doc.contains("CDL2349-140"));
}

#[test]
fn print_requires_a_destination() {
    let (dir, data) = workspace();
    let output = label_cmd(dir.path())
        .args(["print", "CDL2349-120", "--data"])
        .arg(&data)
        .output()
        .expect("run print");
    assert!(!output.status.success());
}

#[test]
fn settings_init_show_reset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("label_settings.json");

    let init = label_cmd(dir.path())
        .args(["settings", "init", "--output", "json"])
        .output()
        .expect("run settings init");
    assert!(init.status.success());
    assert_eq!(json_stdout(&init)["status"], "created");
    assert!(path.exists());

    let again = label_cmd(dir.path())
        .args(["settings", "init", "--output", "json"])
        .output()
        .expect("run settings init");
    assert_eq!(json_stdout(&again)["status"], "exists");

    fs::write(&path, r#"{"width": 600, "template": 2}"#).expect("edit settings");
    let show = label_cmd(dir.path())
        .args(["settings", "show", "--output", "json"])
        .output()
        .expect("run settings show");
    let json = json_stdout(&show);
    assert_eq!(json["settings"]["width"], 600);
    assert_eq!(json["settings"]["template"], 2);
    assert_eq!(json["settings"]["height"], 170);

    let reset = label_cmd(dir.path())
        .args(["settings", "reset", "--output", "json"])
        .output()
        .expect("run settings reset");
    assert!(reset.status.success());
    let text = fs::read_to_string(&path).expect("settings written");
    let saved: serde_json::Value = serde_json::from_str(&text).expect("settings json");
    assert_eq!(saved["width"], 490);
}
