//! Tests for the dplace binary.

use std::fs;
use std::path::Path;
use std::process::Command;

fn dplace() -> Command {
    Command::new(env!("CARGO_BIN_EXE_dplace"))
}

fn raw_export(root: &Path, reference: &str) {
    let dir = root.join("6TH_EDITION");
    fs::create_dir_all(dir.join("societies")).unwrap();
    fs::write(
        dir.join("6th_edition_sources.bib"),
        "CARNEIRO6_006_Ashanti\n@book{bowdich1873,\n  key = {Bowdich 1873}\n}\n",
    )
    .unwrap();
    fs::write(
        dir.join("6th_edition_societies.6theditionsocieties.csv"),
        "ID,Name,Latitude,Longitude,main_focal_year\nCARNEIRO6_006,Ashanti,6.5,-1.5,1895\n",
    )
    .unwrap();
    fs::write(
        dir.join("6th_edition_traits.Sheet1.csv"),
        "Trait_ID_6th,Category,Trait_name,Trait_description\n1,Economy,Markets,Presence of markets\n",
    )
    .unwrap();
    fs::write(
        dir.join("societies").join("CARNEIRO6_006_Ashanti.Sheet1.csv"),
        format!(
            "Trait_ID_6th,Trait_presence,Reference,Original_notes,Comments\n1,1,{},,\n",
            reference
        ),
    )
    .unwrap();
}

#[test]
fn test_split_prints_mentions() {
    let output = dplace()
        .args(["split", "Smith 1925: 12; 14; Jones 1930 passim"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout, "Smith 1925\t12; 14\nJones 1930\tpassim\n");
}

#[test]
fn test_makecldf_writes_tables() {
    let root = tempfile::tempdir().unwrap();
    let raw = root.path().join("raw");
    let out = root.path().join("cldf");
    raw_export(&raw, "Bodwich 1873: 31");

    let output = dplace()
        .arg("makecldf")
        .arg("--raw")
        .arg(&raw)
        .arg("--out")
        .arg(&out)
        .args(["--ref-stats", "5"])
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let values = fs::read_to_string(out.join("values.csv")).unwrap();
    assert!(values.contains("bowdich1873[31]"), "Got: {}", values);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bodwich 1873"), "Got: {}", stdout);
}

#[test]
fn test_unresolved_citation_json_error() {
    let root = tempfile::tempdir().unwrap();
    let raw = root.path().join("raw");
    raw_export(&raw, "Rattray 1929: 4");

    let output = dplace()
        .arg("--json-errors")
        .arg("check")
        .arg("--raw")
        .arg(&raw)
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .find(|line| line.starts_with('{'))
        .expect("Expected JSON output on stderr");
    let json: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(json["kind"], "error");
    assert_eq!(json["code"], "D-1-1");
    assert_eq!(json["title"], "Unresolved Citation");
}

#[test]
fn test_custom_tables() {
    let root = tempfile::tempdir().unwrap();
    let raw = root.path().join("raw");
    raw_export(&raw, "Bowditch 1873: 31; Anonymous 1900");
    let tables = root.path().join("tables.toml");
    fs::write(
        &tables,
        "exclusions = [\"Anonymous 1900\"]\n\n[corrections]\n\"Bowditch 1873\" = \"Bowdich 1873\"\n",
    )
    .unwrap();

    let output = dplace()
        .arg("check")
        .arg("--raw")
        .arg(&raw)
        .arg("--tables")
        .arg(&tables)
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 values, 1 citations, 1 sources"), "Got: {}", stdout);
}

#[test]
fn test_check_reports_unreachable_target_once() {
    let root = tempfile::tempdir().unwrap();
    let raw = root.path().join("raw");
    raw_export(&raw, "Bowdich 1873: 31");
    let tables = root.path().join("tables.toml");
    fs::write(&tables, "[corrections]\n\"Smyth 1901\" = \"Smith 1901\"\n").unwrap();

    let output = dplace()
        .arg("check")
        .arg("--raw")
        .arg(&raw)
        .arg("--tables")
        .arg(&tables)
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.matches("unreachable correction target: Smith 1901").count(),
        1,
        "Got: {}",
        stdout
    );
}
