//! Row validation for the registry KPI engine.
//!
//! The validator turns one raw registry row into a [`kpi_model::KpiInput`]
//! plus the issues it raised. Problems never reject a row: unparsable or
//! implausible values are reported and then treated as absent, and
//! unexpected categorical values pass through untouched so the KPI rules
//! exclude them on their own.

pub mod checks;
mod validator;

pub use checks::CellRef;
pub use checks::numeric::{AGE, Bounds, DIASTOLIC_BP, HBA1C, SYSTOLIC_BP, bounds_for};
pub use validator::{FIRST_DATA_ROW, RowValidator, ValidatedRow, spreadsheet_row};
