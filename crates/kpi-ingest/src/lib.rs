//! Registry ingestion for the KPI engine.
//!
//! This crate turns delimited registry exports into raw tables, resolves
//! inconsistently spelled headers onto canonical fields, normalizes cell
//! values, and loads the population reference table.
//!
//! # Features
//!
//! - **Delimited Reading**: Delimiter auto-detection (`;`, `,`, tab, `|`), BOM stripping
//! - **Header Resolution**: Accent and case insensitive matching with explicit variants
//! - **Field Normalizer**: Dates (ISO, day-first, Excel serial), numbers (comma or dot decimals), text
//! - **Population Index**: Expected HTA/DM populations keyed by normalized group
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use kpi_ingest::{PopulationIndex, TableKind, read_delimited_file};
//!
//! let registry = read_delimited_file(Path::new("registro.csv"), TableKind::Registry)?;
//! let population = PopulationIndex::load(Path::new("poblacion.csv"))?;
//! ```

mod columns;
mod error;
pub mod normalize;
mod population;
mod table;

// === Error Types ===
pub use error::{IngestError, Result, TableKind};

// === Columns ===
pub use columns::{ColumnSpec, FieldKind, HeaderMap, PopulationField, RegistryField};

// === Tables ===
pub use table::{DELIMITER_CANDIDATES, RawTable, detect_delimiter, read_delimited, read_delimited_file};

// === Population ===
pub use population::PopulationIndex;

// === Normalization ===
pub use normalize::{
    from_excel_serial, normalize_count, normalize_date, normalize_number, normalize_text,
    parse_date_text, parse_number,
};
