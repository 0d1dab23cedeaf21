//! Validation check modules.
//!
//! Each check inspects one cell, returns the value the KPI rules may use and
//! records an issue for anything it rejects. Empty cells are absent values,
//! never issues.

pub mod category;
pub mod dates;
pub mod numeric;

use kpi_ingest::{ColumnSpec, RegistryField};
use kpi_model::{CellValue, IssueRecord};

/// Spreadsheet position of the cell being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    /// 1-based spreadsheet row.
    pub row: usize,
    pub field: RegistryField,
}

impl CellRef {
    pub fn new(row: usize, field: RegistryField) -> Self {
        Self { row, field }
    }

    /// Issue record for `cell` at this position.
    pub fn record(&self, cell: &CellValue, explanation: impl Into<String>) -> IssueRecord {
        IssueRecord::new(
            self.row,
            self.field.label(),
            cell.display_value(),
            explanation,
        )
    }
}
