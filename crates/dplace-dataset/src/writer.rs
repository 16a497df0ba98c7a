//! Writing a [`Dataset`] as CSV tables plus a BibTeX file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::cldf::{Code, Dataset, Parameter, Society, Value};
use crate::error::{DatasetError, Result};

pub const SOCIETIES_TABLE: &str = "societies.csv";
pub const PARAMETERS_TABLE: &str = "parameters.csv";
pub const CODES_TABLE: &str = "codes.csv";
pub const VALUES_TABLE: &str = "values.csv";
pub const SOURCES_FILE: &str = "sources.bib";

/// Separator of list-valued cells.
pub const LIST_SEPARATOR: &str = ";";

#[derive(Serialize)]
struct SocietyRecord<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Latitude")]
    latitude: &'a str,
    #[serde(rename = "Longitude")]
    longitude: &'a str,
    #[serde(rename = "Glottocode")]
    glottocode: &'a str,
    #[serde(rename = "Name_and_ID_in_source")]
    name_and_id_in_source: &'a str,
    xd_id: &'a str,
    main_focal_year: Option<i32>,
    #[serde(rename = "HRAF_name_ID")]
    hraf_name_id: &'a str,
    #[serde(rename = "HRAF_ID")]
    hraf_id: &'a str,
    region: &'a str,
    comment: &'a str,
}

impl<'a> From<&'a Society> for SocietyRecord<'a> {
    fn from(s: &'a Society) -> Self {
        Self {
            id: &s.id,
            name: &s.name,
            latitude: &s.latitude,
            longitude: &s.longitude,
            glottocode: &s.glottocode,
            name_and_id_in_source: &s.name_and_id_in_source,
            xd_id: &s.xd_id,
            main_focal_year: s.focal_year,
            hraf_name_id: &s.hraf_name_id,
            hraf_id: &s.hraf_id,
            region: &s.region,
            comment: &s.comment,
        }
    }
}

#[derive(Serialize)]
struct ParameterRecord<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    category: String,
    #[serde(rename = "type")]
    datatype: &'static str,
}

impl<'a> From<&'a Parameter> for ParameterRecord<'a> {
    fn from(p: &'a Parameter) -> Self {
        Self {
            id: &p.id,
            name: &p.name,
            description: &p.description,
            category: p.category.join(LIST_SEPARATOR),
            datatype: Parameter::DATATYPE,
        }
    }
}

#[derive(Serialize)]
struct CodeRecord<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Var_ID")]
    var_id: &'a str,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    ord: u8,
}

impl<'a> From<&'a Code> for CodeRecord<'a> {
    fn from(c: &'a Code) -> Self {
        Self {
            id: &c.id,
            var_id: &c.var_id,
            name: &c.name,
            description: &c.description,
            ord: c.ord,
        }
    }
}

#[derive(Serialize)]
struct ValueRecord<'a> {
    #[serde(rename = "ID")]
    id: &'a str,
    #[serde(rename = "Var_ID")]
    var_id: &'a str,
    #[serde(rename = "Code_ID")]
    code_id: &'a str,
    #[serde(rename = "Soc_ID")]
    soc_id: &'a str,
    #[serde(rename = "Value")]
    value: &'a str,
    #[serde(rename = "Comment")]
    comment: &'a str,
    #[serde(rename = "Source")]
    source: String,
    admin_comment: &'a str,
    year: Option<i32>,
}

impl<'a> From<&'a Value> for ValueRecord<'a> {
    fn from(v: &'a Value) -> Self {
        Self {
            id: &v.id,
            var_id: &v.var_id,
            code_id: &v.code_id,
            soc_id: &v.soc_id,
            value: &v.value,
            comment: &v.comment,
            source: v
                .source
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(LIST_SEPARATOR),
            admin_comment: &v.admin_comment,
            year: v.year,
        }
    }
}

/// Write every table of `dataset` into `out_dir`, creating it if needed.
pub fn write_dataset(dataset: &Dataset, out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir).map_err(|e| DatasetError::io(out_dir, e))?;

    write_table(out_dir.join(SOCIETIES_TABLE), dataset.societies.iter().map(SocietyRecord::from))?;
    write_table(
        out_dir.join(PARAMETERS_TABLE),
        dataset.parameters.iter().map(ParameterRecord::from),
    )?;
    write_table(out_dir.join(CODES_TABLE), dataset.codes.iter().map(CodeRecord::from))?;
    write_table(out_dir.join(VALUES_TABLE), dataset.values.iter().map(ValueRecord::from))?;

    let bibtex: String = dataset
        .sources
        .iter()
        .map(|entry| entry.to_bibtex())
        .collect::<Vec<_>>()
        .join("\n");
    let path = out_dir.join(SOURCES_FILE);
    fs::write(&path, bibtex).map_err(|e| DatasetError::io(path, e))?;

    info!(
        out_dir = %out_dir.display(),
        values = dataset.values.len(),
        sources = dataset.sources.len(),
        "Wrote dataset"
    );
    Ok(())
}

fn write_table<T: Serialize>(path: PathBuf, records: impl Iterator<Item = T>) -> Result<()> {
    let mut writer = csv::Writer::from_path(&path).map_err(|e| DatasetError::csv(&path, e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| DatasetError::csv(&path, e))?;
    }
    writer
        .flush()
        .map_err(|e| DatasetError::io(&path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dplace_refs::ResolvedSource;

    fn value(source: Vec<ResolvedSource>) -> Value {
        Value {
            id: "1".to_string(),
            var_id: "CARNEIRO6_12".to_string(),
            code_id: "CARNEIRO6_12-1".to_string(),
            soc_id: "CARNEIRO6_037".to_string(),
            value: "1".to_string(),
            comment: "cattle camps".to_string(),
            source,
            admin_comment: String::new(),
            year: Some(1930),
        }
    }

    #[test]
    fn test_values_table() {
        let dir = tempfile::tempdir().unwrap();
        let dataset = Dataset {
            values: vec![value(vec![
                ResolvedSource::new("evanspritchard1940b", Some("12; 14")),
                ResolvedSource::new("evanspritchard1940a", None),
            ])],
            ..Default::default()
        };
        write_dataset(&dataset, dir.path()).unwrap();

        let text = fs::read_to_string(dir.path().join(VALUES_TABLE)).unwrap();
        insta::assert_snapshot!(text, @r#"
        ID,Var_ID,Code_ID,Soc_ID,Value,Comment,Source,admin_comment,year
        1,CARNEIRO6_12,CARNEIRO6_12-1,CARNEIRO6_037,1,cattle camps,"evanspritchard1940b[12, 14];evanspritchard1940a",,1930
        "#);
    }

    #[test]
    fn test_empty_dataset_writes_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("cldf");
        write_dataset(&Dataset::default(), &out).unwrap();
        for name in [SOCIETIES_TABLE, PARAMETERS_TABLE, CODES_TABLE, VALUES_TABLE, SOURCES_FILE] {
            assert!(out.join(name).exists(), "{} not written", name);
        }
    }
}
