//! Dataset Sources - where snapshot rows come from
//!
//! Loading + cleaning happen here, outside the scoring path.

use std::io::Read;
use std::path::PathBuf;

use crate::error::RiskResult;
use crate::logic::record::{Record, Value};
use super::schema::{DatasetSchema, TextEncoding};

/// Provider of raw, cleaned rows for a dataset
pub trait DatasetSource: Send + Sync {
    fn load(&self, schema: &DatasetSchema) -> RiskResult<Vec<Record>>;
}

/// Reads `<dir>/<schema.file_name>`
#[derive(Debug, Clone)]
pub struct CsvDatasetSource {
    dir: PathBuf,
}

impl CsvDatasetSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DatasetSource for CsvDatasetSource {
    fn load(&self, schema: &DatasetSchema) -> RiskResult<Vec<Record>> {
        let path = self.dir.join(schema.file_name);
        log::info!("Loading {} dataset from: {}", schema.kind, path.display());

        let file = std::fs::File::open(&path)?;
        let rows = parse_csv(file, schema.missing_markers, schema.encoding)?;
        let loaded = rows.len();
        let rows = clean(rows, schema);

        log::info!(
            "{} dataset: {} rows loaded, {} kept after cleaning",
            schema.kind,
            loaded,
            rows.len()
        );
        Ok(rows)
    }
}

/// Parse CSV with a header row into records.
/// Cells are decoded with `encoding`; empty cells and `missing_markers`
/// become absent values.
pub fn parse_csv<R: Read>(reader: R, missing_markers: &[&str], encoding: TextEncoding) -> RiskResult<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .byte_headers()?
        .iter()
        .map(|h| encoding.decode(h))
        .collect();
    let mut rows = Vec::new();

    for result in csv_reader.byte_records() {
        let raw = result?;
        let record = headers
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let cell = encoding.decode(raw.get(i).unwrap_or_default());
                let value = if cell.is_empty() || missing_markers.contains(&cell.as_str()) {
                    None
                } else {
                    Some(Value::parse(&cell))
                };
                (name.clone(), value)
            })
            .collect();
        rows.push(record);
    }

    Ok(rows)
}

/// Apply the schema's cleaning rules
pub fn clean(rows: Vec<Record>, schema: &DatasetSchema) -> Vec<Record> {
    if schema.drop_incomplete {
        rows.into_iter().filter(|r| !r.has_missing()).collect()
    } else {
        rows
    }
}
