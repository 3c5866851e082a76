//! CSV row loading from in-memory strings.
//!
//! Reading files (and decoding them) is the caller's job; these functions
//! only map configured columns onto engine records.

use std::collections::HashMap;

use crate::config::{ReferenceConfig, SourceConfig};
use crate::error::ResolveError;
use crate::model::RawNameRecord;

const SOURCE: &str = "source";
const REFERENCE: &str = "reference";

fn reader(csv_data: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes())
}

fn headers(reader: &mut csv::Reader<&[u8]>, dataset: &str) -> Result<Vec<String>, ResolveError> {
    Ok(reader
        .headers()
        .map_err(|e| csv_err(dataset, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect())
}

fn column_index(headers: &[String], dataset: &str, name: &str) -> Result<usize, ResolveError> {
    headers.iter().position(|h| h == name).ok_or_else(|| ResolveError::MissingColumn {
        dataset: dataset.into(),
        column: name.into(),
    })
}

fn csv_err(dataset: &str, e: csv::Error) -> ResolveError {
    ResolveError::Csv {
        dataset: dataset.into(),
        message: e.to_string(),
    }
}

/// Load ratings rows, applying the configured column mapping. Every column
/// is kept in `raw_fields` for passthrough export.
pub fn load_source_rows(csv_data: &str, config: &SourceConfig) -> Result<Vec<RawNameRecord>, ResolveError> {
    let mut reader = reader(csv_data);
    let headers = headers(&mut reader, SOURCE)?;

    let cols = &config.columns;
    let record_id_idx = column_index(&headers, SOURCE, &cols.record_id)?;
    let first_idx = column_index(&headers, SOURCE, &cols.first_name)?;
    let last_idx = column_index(&headers, SOURCE, &cols.last_name)?;
    let department_idx = match cols.department {
        Some(ref name) => Some(column_index(&headers, SOURCE, name)?),
        None => None,
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_err(SOURCE, e))?;
        let field = |i: usize| record.get(i).unwrap_or("").to_string();

        let department = department_idx.map(field).filter(|d| !d.trim().is_empty());

        let raw_fields: HashMap<String, String> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| record.get(i).map(|v| (h.clone(), v.to_string())))
            .collect();

        rows.push(RawNameRecord {
            record_id: field(record_id_idx),
            first_name: field(first_idx),
            last_name: field(last_idx),
            department,
            raw_fields,
        });
    }

    log::debug!("loaded {} source rows", rows.len());
    Ok(rows)
}

/// Load the free-text instructors column. Blank cells become `None`.
pub fn load_reference_fields(csv_data: &str, config: &ReferenceConfig) -> Result<Vec<Option<String>>, ResolveError> {
    let mut reader = reader(csv_data);
    let headers = headers(&mut reader, REFERENCE)?;
    let idx = column_index(&headers, REFERENCE, &config.column)?;

    let mut fields = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_err(REFERENCE, e))?;
        let value = record.get(idx).filter(|v| !v.trim().is_empty()).map(str::to_string);
        fields.push(value);
    }

    log::debug!("loaded {} reference rows", fields.len());
    Ok(fields)
}
