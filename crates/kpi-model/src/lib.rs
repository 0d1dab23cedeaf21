//! Data model for the chronic-disease registry KPI engine.
//!
//! This crate holds the plain types shared by every stage of a reporting
//! pass: raw cell values, the normalized patient row consumed by the KPI
//! rules, group keys, counters, issue records and the final report.
//!
//! Nothing here performs I/O. All types that leave the engine implement
//! `serde::Serialize` so presentation layers can consume them directly.

mod cell;
mod counters;
mod group;
mod issue;
mod period;
mod report;
mod row;

pub use cell::CellValue;
pub use counters::{Indicators, KpiCounters, PopulationEntry, format_percent};
pub use group::{GroupKey, normalize_label};
pub use issue::{IssueKind, IssueRecord, IssueSet};
pub use period::{PeriodError, RecencyWindow, ReportPeriod};
pub use report::{GrandTotal, GroupResult, KpiReport, RollUp};
pub use row::{DiagnosisFlag, KpiInput};
