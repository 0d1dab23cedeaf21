//! Error types for registry ingestion.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which input a fatal error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// Patient registry exported from the spreadsheet.
    Registry,
    /// Expected population per department, municipality and provider.
    Population,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry => write!(f, "registry"),
            Self::Population => write!(f, "population"),
        }
    }
}

/// Errors that abort a pass before any row is processed.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Required columns were not found in the header row.
    #[error("{table} table is missing required columns: {}", columns.join(", "))]
    MissingColumns {
        table: TableKind,
        columns: Vec<String>,
    },

    /// The table has no header line.
    #[error("{table} table is empty")]
    EmptyTable { table: TableKind },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited text.
    #[error("failed to parse delimited text: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
