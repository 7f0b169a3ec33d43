use indexmap::IndexMap;
use std::path::Path;

use crate::error::{Result, SeedError};

/// Prefix marking audio metadata columns in datasets.csv and dataset_files.csv
pub const AUDIO_PREFIX: &str = "audio_";

/// One CSV line, columns in header order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceRow {
    /// File the row was read from, for error messages
    pub file: String,
    pub values: IndexMap<String, String>,
}

impl SourceRow {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            values: IndexMap::new(),
        }
    }

    /// Builder-style column setter, mostly for tests
    pub fn with(mut self, column: &str, value: &str) -> Self {
        self.values.insert(column.to_string(), value.to_string());
        self
    }

    pub fn field(&self, column: &str) -> Result<&str> {
        self.values
            .get(column)
            .map(String::as_str)
            .ok_or_else(|| SeedError::MissingColumn {
                file: self.file.clone(),
                column: column.to_string(),
            })
    }

    /// Non-empty `audio_*` columns with the prefix stripped
    pub fn audio_fields(&self) -> IndexMap<String, String> {
        self.values
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .filter_map(|(column, value)| {
                column
                    .strip_prefix(AUDIO_PREFIX)
                    .map(|name| (name.to_string(), value.clone()))
            })
            .collect()
    }
}

/// Read every row of a CSV file with a header line.
///
/// Surrounding whitespace of each field is trimmed.
pub fn load_rows(path: &Path) -> Result<Vec<SourceRow>> {
    if !path.is_file() {
        return Err(SeedError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;
        let values = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.to_string(), value.to_string()))
            .collect();
        rows.push(SourceRow {
            file: file_name.clone(),
            values,
        });
    }

    Ok(rows)
}
