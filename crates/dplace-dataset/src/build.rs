//! Building the value tables from a raw export.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::{info, warn};

use dplace_refs::{BibliographyIndex, CorrectionTables, ResolutionObserver, Resolver};

use crate::bib::{BibEntry, SocietySources, bibliography_records, parse_society_bibliography};
use crate::cldf::{Code, Dataset, Parameter, Society, Value, mkid};
use crate::error::{DatasetError, Result};
use crate::raw::{RawDataset, SocietyRow, TraitSheet};

/// Read `raw` and resolve every trait value's references through `tables`.
///
/// Fails on the first unresolved citation, so a returned dataset never
/// carries a value with a missing source.
pub fn build(
    raw: &RawDataset,
    tables: &CorrectionTables,
    observer: &mut dyn ResolutionObserver,
) -> Result<Dataset> {
    let bibliography = parse_society_bibliography(&raw.bibliography_text()?)?;
    let index = BibliographyIndex::build(bibliography_records(&bibliography)?)?;
    info!(
        societies = bibliography.len(),
        keys = index.len(),
        "Indexed society bibliography"
    );
    let unreachable_targets: Vec<String> = tables
        .unreachable_targets(&index)
        .into_iter()
        .map(str::to_string)
        .collect();
    for target in &unreachable_targets {
        warn!(target_key = %target, "Correction target is not a bibliography key");
    }

    let societies = raw
        .societies()?
        .into_iter()
        .map(society)
        .collect::<Result<Vec<_>>>()?;
    check_bibliography_societies(&bibliography, &societies)?;
    let focal_years: HashMap<&str, Option<i32>> = societies
        .iter()
        .map(|s| (s.id.as_str(), s.focal_year))
        .collect();

    let mut parameters = Vec::new();
    let mut codes = Vec::new();
    for row in raw.traits()? {
        if row.trait_id.is_empty() {
            continue;
        }
        let id = mkid(&row.trait_id);
        codes.extend(Code::presence_codes(&id));
        parameters.push(Parameter {
            id,
            name: row.name,
            description: row.description,
            category: vec![row.category],
        });
    }
    info!(parameters = parameters.len(), "Read trait list");

    let resolver = Resolver::new(tables, &index);
    let mut values = Vec::new();
    for sheet in raw.sheets()? {
        sheet_values(&resolver, &sheet, &focal_years, observer, &mut values)?;
    }
    info!(values = values.len(), "Resolved trait sheets");

    Ok(Dataset {
        societies,
        parameters,
        codes,
        values,
        sources: dedup_sources(bibliography),
        unreachable_targets,
    })
}

fn society(row: SocietyRow) -> Result<Society> {
    if row.id.is_empty() {
        return Err(DatasetError::MissingValue {
            column: "ID".to_string(),
            context: format!("the society list (society '{}')", row.name),
        });
    }
    if row.latitude.is_empty() {
        return Err(DatasetError::MissingValue {
            column: "Latitude".to_string(),
            context: format!("society '{}'", row.id),
        });
    }
    let focal_year = match row.main_focal_year.as_str() {
        "" => None,
        year => Some(year.parse::<i32>().map_err(|_| DatasetError::InvalidFocalYear {
            society: row.id.clone(),
            value: year.to_string(),
        })?),
    };

    Ok(Society {
        id: row.id,
        name: row.name,
        latitude: row.latitude,
        longitude: row.longitude,
        glottocode: row.glottocode,
        name_and_id_in_source: row.name_and_id_in_source,
        xd_id: row.xd_id,
        focal_year,
        hraf_name_id: row.hraf_name_id,
        hraf_id: row.hraf_id,
        region: row.region,
        comment: row.comment,
    })
}

/// Every society owning bibliography entries must be a listed society.
fn check_bibliography_societies(bibliography: &[SocietySources], societies: &[Society]) -> Result<()> {
    let known: HashSet<&str> = societies.iter().map(|s| s.id.as_str()).collect();
    match bibliography.iter().find(|b| !known.contains(b.society.as_str())) {
        Some(unknown) => Err(DatasetError::UnknownSociety {
            society: unknown.society.clone(),
            context: "the society bibliography".to_string(),
        }),
        None => Ok(()),
    }
}

fn sheet_values(
    resolver: &Resolver<'_>,
    sheet: &TraitSheet,
    focal_years: &HashMap<&str, Option<i32>>,
    observer: &mut dyn ResolutionObserver,
    values: &mut Vec<Value>,
) -> Result<()> {
    let soc_id = sheet.society();
    for row in &sheet.rows {
        if row.trait_id.is_empty() {
            continue;
        }
        let year = *focal_years
            .get(soc_id.as_str())
            .ok_or_else(|| DatasetError::UnknownSociety {
                society: soc_id.clone(),
                context: format!("trait sheet '{}'", sheet.stem),
            })?;
        let source = resolver.resolve_field(&row.reference, &sheet.stem, observer)?;
        let id = (values.len() + 2).to_string();
        let var_id = mkid(&row.trait_id);

        values.push(Value {
            id,
            code_id: format!("{}-{}", var_id, row.presence),
            var_id,
            soc_id: soc_id.clone(),
            value: row.presence.clone(),
            comment: row.original_notes.clone(),
            source,
            admin_comment: row.comments.clone(),
            year,
        });
    }
    Ok(())
}

/// A source listed under two societies is written once.
fn dedup_sources(bibliography: Vec<SocietySources>) -> Vec<BibEntry> {
    let mut sources: IndexMap<String, BibEntry> = IndexMap::new();
    for entry in bibliography.into_iter().flat_map(|s| s.entries) {
        sources.entry(entry.id.clone()).or_insert(entry);
    }
    sources.into_values().collect()
}
