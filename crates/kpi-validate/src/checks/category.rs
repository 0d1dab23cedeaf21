//! Diagnosis flag vocabulary check.

use kpi_ingest::normalize_text;
use kpi_model::{CellValue, DiagnosisFlag, IssueKind, IssueSet};

use super::CellRef;

/// Maps a flag cell onto `SI`/`NO`.
///
/// Values outside the vocabulary are reported with the expected set and
/// passed through untouched as [`DiagnosisFlag::Other`].
pub fn check_flag(cell: &CellValue, at: CellRef, issues: &mut IssueSet) -> DiagnosisFlag {
    match DiagnosisFlag::from_normalized(&normalize_text(cell)) {
        DiagnosisFlag::Other(_) => {
            issues.push(
                IssueKind::Categorical,
                at.record(cell, DiagnosisFlag::VOCABULARY.join(", ")),
            );
            DiagnosisFlag::Other(cell.display_value())
        }
        flag => flag,
    }
}
