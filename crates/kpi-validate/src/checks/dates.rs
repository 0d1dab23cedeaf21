//! Date plausibility checks ("fechas dudosas").

use chrono::NaiveDate;
use kpi_ingest::normalize_date;
use kpi_model::{CellValue, IssueKind, IssueSet, ReportPeriod};

use super::CellRef;

/// Parses a date cell and rejects dates outside the plausible range.
///
/// Unparsable and implausible dates are reported and treated as absent.
pub fn check_date(
    cell: &CellValue,
    at: CellRef,
    period: &ReportPeriod,
    issues: &mut IssueSet,
) -> Option<NaiveDate> {
    if cell.is_blank() {
        return None;
    }

    let Some(date) = normalize_date(cell) else {
        issues.push(IssueKind::Date, at.record(cell, "fecha no reconocida"));
        return None;
    };

    if !period.is_plausible(date) {
        let (earliest, latest) = period.plausible_range();
        issues.push(
            IssueKind::Date,
            at.record(
                cell,
                format!("fecha fuera de rango ({earliest} a {latest})"),
            ),
        );
        return None;
    }

    Some(date)
}
