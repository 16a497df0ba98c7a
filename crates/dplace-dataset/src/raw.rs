//! Access to the raw 6th edition export.
//!
//! ```text
//! <raw>/6TH_EDITION/
//! ├── 6th_edition_sources.bib
//! ├── 6th_edition_societies.6theditionsocieties.csv
//! ├── 6th_edition_traits.Sheet1.csv
//! └── societies/
//!     ├── CARNEIRO6_006_Ashanti.Sheet1.csv
//!     └── ...
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use walkdir::WalkDir;

use crate::error::{DatasetError, Result};

pub const EDITION_DIR: &str = "6TH_EDITION";
pub const BIBLIOGRAPHY_FILE: &str = "6th_edition_sources.bib";
pub const SOCIETIES_FILE: &str = "6th_edition_societies.6theditionsocieties.csv";
pub const TRAITS_FILE: &str = "6th_edition_traits.Sheet1.csv";
pub const SHEETS_DIR: &str = "societies";

/// A row of the society list. Every cell is trimmed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SocietyRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Latitude")]
    pub latitude: String,
    #[serde(rename = "Longitude")]
    pub longitude: String,
    #[serde(rename = "Glottocode")]
    pub glottocode: String,
    #[serde(rename = "Name_and_ID_in_source")]
    pub name_and_id_in_source: String,
    pub xd_id: String,
    pub main_focal_year: String,
    #[serde(rename = "HRAF_name_ID")]
    pub hraf_name_id: String,
    #[serde(rename = "HRAF_ID")]
    pub hraf_id: String,
    pub region: String,
    pub comment: String,
}

/// A row of the trait list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TraitRow {
    #[serde(rename = "Trait_ID_6th")]
    pub trait_id: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Trait_name")]
    pub name: String,
    #[serde(rename = "Trait_description")]
    pub description: String,
}

/// A row of a society's trait sheet.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SheetRow {
    #[serde(rename = "Trait_ID_6th")]
    pub trait_id: String,
    #[serde(rename = "Trait_presence")]
    pub presence: String,
    #[serde(rename = "Reference")]
    pub reference: String,
    #[serde(rename = "Original_notes")]
    pub original_notes: String,
    #[serde(rename = "Comments")]
    pub comments: String,
}

/// One society's trait sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitSheet {
    /// File stem, e.g. `CARNEIRO6_037_Nuer.Sheet1`. Contextual overrides
    /// are keyed on it.
    pub stem: String,
    pub rows: Vec<SheetRow>,
}

impl TraitSheet {
    /// Society id: the first two `_`-separated parts of the stem.
    pub fn society(&self) -> String {
        self.stem.split('_').take(2).collect::<Vec<_>>().join("_")
    }
}

/// The `6TH_EDITION` directory of a raw download.
#[derive(Debug, Clone)]
pub struct RawDataset {
    dir: PathBuf,
}

impl RawDataset {
    pub fn new(edition_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: edition_dir.into(),
        }
    }

    /// The edition directory below a dataset's `raw/` directory.
    pub fn from_raw_dir(raw: impl AsRef<Path>) -> Self {
        Self::new(raw.as_ref().join(EDITION_DIR))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn bibliography_text(&self) -> Result<String> {
        let path = self.dir.join(BIBLIOGRAPHY_FILE);
        fs::read_to_string(&path).map_err(|e| DatasetError::io(path, e))
    }

    pub fn societies(&self) -> Result<Vec<SocietyRow>> {
        read_csv(&self.dir.join(SOCIETIES_FILE))
    }

    pub fn traits(&self) -> Result<Vec<TraitRow>> {
        read_csv(&self.dir.join(TRAITS_FILE))
    }

    /// Every `*.csv` trait sheet, in file-name order.
    pub fn sheets(&self) -> Result<Vec<TraitSheet>> {
        let dir = self.dir.join(SHEETS_DIR);
        let mut sheets = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map_or_else(|| dir.clone(), Path::to_path_buf);
                DatasetError::io(path, e.into())
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "csv") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            sheets.push(TraitSheet {
                stem: stem.to_string(),
                rows: read_csv(path)?,
            });
        }
        Ok(sheets)
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DatasetError::csv(path, e))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(|e| DatasetError::csv(path, e))
}
