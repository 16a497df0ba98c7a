//! End-to-end conversion of a small synthetic raw export.

use std::fs;
use std::path::Path;

use dplace_dataset::raw::{BIBLIOGRAPHY_FILE, EDITION_DIR, SHEETS_DIR, SOCIETIES_FILE, TRAITS_FILE};
use dplace_dataset::writer::{SOURCES_FILE, VALUES_TABLE};
use dplace_dataset::{DatasetError, RawDataset, build, parse_entries, write_dataset};
use dplace_refs::{CorrectionTables, KeyFrequency, NoopObserver, TracingObserver};

const BIBLIOGRAPHY: &str = "\
CARNEIRO6_006_Ashanti
@book{bowdich1873,
  author = {Bowdich, T. Edward},
  year = {1873},
  key = {Bowdich 1873}
}
@book{rattray1927,
  author = {Rattray, R. S.},
  key = {Rattray 1927}
}
CARNEIRO6_037_Nuer
@book{evanspritchard1940b,
  author = {Evans-Pritchard, E. E.},
  title = {The Nuer},
  key = {Evans-Pritchard (1940b)}
}
@book{rattray1927,
  author = {Rattray, R. S.},
  key = {Rattray 1927}
}
";

const SOCIETIES: &str = "\
ID,Name,Latitude,Longitude,Glottocode,Name_and_ID_in_source,xd_id,main_focal_year,HRAF_name_ID,HRAF_ID,region,comment
CARNEIRO6_006, Ashanti ,6.5,-1.5,asan1239,Ashanti (6),xd1,1895,Ashanti (FE12),FE12,West Africa,
CARNEIRO6_037,Nuer,8.5,30.0,nuer1246,Nuer (37),xd2,,Nuer (FJ22),FJ22,East Africa,
";

const TRAITS: &str = "\
Trait_ID_6th,Category,Trait_name,Trait_description
1,Economy,Markets,Presence of markets
,,,
2,Politics,Chiefs,Presence of chiefs
";

const SHEET_HEADER: &str = "Trait_ID_6th,Trait_presence,Reference,Original_notes,Comments\n";

fn raw_dir(root: &Path, sheets: &[(&str, &str)]) {
    let dir = root.join(EDITION_DIR);
    fs::create_dir_all(dir.join(SHEETS_DIR)).unwrap();
    fs::write(dir.join(BIBLIOGRAPHY_FILE), BIBLIOGRAPHY).unwrap();
    fs::write(dir.join(SOCIETIES_FILE), SOCIETIES).unwrap();
    fs::write(dir.join(TRAITS_FILE), TRAITS).unwrap();
    for (stem, rows) in sheets {
        let text = format!("{}{}", SHEET_HEADER, rows);
        fs::write(dir.join(SHEETS_DIR).join(format!("{}.csv", stem)), text).unwrap();
    }
}

fn default_sheets() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "CARNEIRO6_037_Nuer.Sheet1",
            "1,0,Evans-Pritchard 1940: 12; 14,no markets,\n2,1,Rattray 1927,,checked\n",
        ),
        (
            "CARNEIRO6_006_Ashanti.Sheet1",
            "1,1,\"Bodwich 1873: 31; Rattray1927: 4-5\",weekly markets,\n,,,,\n",
        ),
    ]
}

#[test]
fn test_build_resolves_every_value() {
    let root = tempfile::tempdir().unwrap();
    raw_dir(root.path(), &default_sheets());
    let raw = RawDataset::from_raw_dir(root.path());

    let dataset = build(&raw, &CorrectionTables::carneiro6(), &mut TracingObserver).unwrap();

    assert_eq!(dataset.societies.len(), 2);
    assert_eq!(dataset.societies[0].name, "Ashanti");
    assert_eq!(dataset.societies[0].focal_year, Some(1895));

    let parameter_ids: Vec<_> = dataset.parameters.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(parameter_ids, vec!["CARNEIRO6_1", "CARNEIRO6_2"]);
    assert_eq!(dataset.parameters[1].category, vec!["Politics"]);
    assert_eq!(dataset.codes.len(), 4);

    // Sheets are read in file-name order.
    let values: Vec<(&str, &str, &str, Option<i32>)> = dataset
        .values
        .iter()
        .map(|v| (v.id.as_str(), v.soc_id.as_str(), v.code_id.as_str(), v.year))
        .collect();
    assert_eq!(
        values,
        vec![
            ("2", "CARNEIRO6_006", "CARNEIRO6_1-1", Some(1895)),
            ("3", "CARNEIRO6_037", "CARNEIRO6_1-0", None),
            ("4", "CARNEIRO6_037", "CARNEIRO6_2-1", None),
        ]
    );

    let sources: Vec<Vec<String>> = dataset
        .values
        .iter()
        .map(|v| v.source.iter().map(ToString::to_string).collect())
        .collect();
    assert_eq!(
        sources,
        vec![
            vec!["bowdich1873[31]".to_string(), "rattray1927[4-5]".to_string()],
            vec!["evanspritchard1940b[12, 14]".to_string()],
            vec!["rattray1927".to_string()],
        ]
    );
    assert_eq!(dataset.values[1].comment, "no markets");
    assert_eq!(dataset.values[2].admin_comment, "checked");

    let source_ids: Vec<_> = dataset.sources.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(source_ids, vec!["bowdich1873", "rattray1927", "evanspritchard1940b"]);
}

#[test]
fn test_written_tables() {
    let root = tempfile::tempdir().unwrap();
    raw_dir(root.path(), &default_sheets());
    let raw = RawDataset::from_raw_dir(root.path());
    let dataset = build(&raw, &CorrectionTables::carneiro6(), &mut NoopObserver).unwrap();

    let out = root.path().join("cldf");
    write_dataset(&dataset, &out).unwrap();

    let values = fs::read_to_string(out.join(VALUES_TABLE)).unwrap();
    let lines: Vec<_> = values.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[1],
        "2,CARNEIRO6_1,CARNEIRO6_1-1,CARNEIRO6_006,1,weekly markets,bowdich1873[31];rattray1927[4-5],,1895"
    );

    let bib = fs::read_to_string(out.join(SOURCES_FILE)).unwrap();
    let entries = parse_entries(&bib).unwrap();
    let written: Vec<_> = entries.iter().map(|e| (e.id.clone(), e.citation_key())).collect();
    let expected: Vec<_> = dataset.sources.iter().map(|e| (e.id.clone(), e.citation_key())).collect();
    assert_eq!(written, expected);
    assert_eq!(entries[0].field("author").as_deref(), Some("Bowdich, T. Edward"));
}

#[test]
fn test_observer_sees_raw_keys() {
    let root = tempfile::tempdir().unwrap();
    raw_dir(root.path(), &default_sheets());
    let raw = RawDataset::from_raw_dir(root.path());
    let mut freq = KeyFrequency::new();

    build(&raw, &CorrectionTables::carneiro6(), &mut freq).unwrap();

    assert_eq!(freq.total(), 4);
    assert_eq!(freq.count("Bodwich 1873"), 1);
    assert_eq!(freq.count("Evans-Pritchard 1940"), 1);
}

#[test]
fn test_unresolved_citation_aborts_build() {
    let root = tempfile::tempdir().unwrap();
    raw_dir(
        root.path(),
        &[("CARNEIRO6_006_Ashanti.Sheet1", "1,1,Evans-Pritchard 1940: 3,,\n")],
    );
    let raw = RawDataset::from_raw_dir(root.path());

    // The Evans-Pritchard override only applies to the Nuer sheet.
    let err = build(&raw, &CorrectionTables::carneiro6(), &mut NoopObserver).unwrap_err();
    match &err {
        DatasetError::References(dplace_refs::Error::UnresolvedCitation { key, record, .. }) => {
            assert_eq!(key, "Evans-Pritchard 1940");
            assert_eq!(record, "CARNEIRO6_006_Ashanti.Sheet1");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("D-1-1"));
}

#[test]
fn test_sheet_for_unknown_society() {
    let root = tempfile::tempdir().unwrap();
    raw_dir(root.path(), &[("CARNEIRO6_099_Nowhere.Sheet1", "1,1,Rattray 1927,,\n")]);
    let raw = RawDataset::from_raw_dir(root.path());

    let err = build(&raw, &CorrectionTables::carneiro6(), &mut NoopObserver).unwrap_err();
    assert!(
        matches!(&err, DatasetError::UnknownSociety { society, .. } if society == "CARNEIRO6_099"),
        "Got: {:?}",
        err
    );
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("D-2-4"));
}

#[test]
fn test_missing_raw_directory() {
    let root = tempfile::tempdir().unwrap();
    let raw = RawDataset::from_raw_dir(root.path());
    let err = build(&raw, &CorrectionTables::carneiro6(), &mut NoopObserver).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }), "Got: {:?}", err);
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("D-2-1"));
}

#[test]
fn test_unreachable_targets_are_collected() {
    let root = tempfile::tempdir().unwrap();
    raw_dir(root.path(), &[("CARNEIRO6_006_Ashanti.Sheet1", "1,1,Rattray 1927,,\n")]);
    let raw = RawDataset::from_raw_dir(root.path());
    let tables = CorrectionTables::from_toml_str(
        "tables.toml",
        "[corrections]\n\"Bodwich 1873\" = \"Bowdich 1873\"\n\"Smyth 1901\" = \"Smith 1901\"\n",
    )
    .unwrap();

    let dataset = build(&raw, &tables, &mut NoopObserver).unwrap();
    assert_eq!(dataset.unreachable_targets, vec!["Smith 1901"]);
    assert_eq!(dataset.values[0].id, "2");
}
