//! Error types for seed generation
//!
//! Every failure is terminal for the run: nothing is written unless the whole
//! script has been composed.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    /// A required CSV or a referenced audio file is absent
    #[error("Missing input: {}", .path.display())]
    MissingInput { path: PathBuf },

    /// A foreign key lookup by natural key failed
    #[error("Unresolved reference: no {table} entry for {key:?}")]
    UnresolvedReference { table: &'static str, key: String },

    /// A field could not be interpreted
    #[error("Malformed value in {file}, field {field}: {value:?} ({reason})")]
    MalformedValue {
        file: String,
        field: String,
        value: String,
        reason: String,
    },

    /// A row lacks a column the builder consumes
    #[error("Missing column {column:?} in {file}")]
    MissingColumn { file: String, column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Credential hashing error: {0}")]
    Credential(#[from] bcrypt::BcryptError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tables listed out of foreign key order
    #[error("Dependency order violated: {0}")]
    DependencyOrder(String),
}

pub type Result<T> = std::result::Result<T, SeedError>;

impl SeedError {
    pub fn unresolved(table: &'static str, key: impl Into<String>) -> Self {
        SeedError::UnresolvedReference {
            table,
            key: key.into(),
        }
    }
}
