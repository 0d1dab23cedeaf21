//! Numeric parsing and physiological bounds.

use kpi_ingest::{RegistryField, normalize_number};
use kpi_model::{CellValue, IssueKind, IssueSet};

use super::CellRef;

/// Closed range of acceptable values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const SYSTOLIC_BP: Bounds = Bounds::new(40.0, 300.0);
pub const DIASTOLIC_BP: Bounds = Bounds::new(20.0, 200.0);
pub const HBA1C: Bounds = Bounds::new(2.0, 25.0);
pub const AGE: Bounds = Bounds::new(0.0, 120.0);

/// Bounds enforced for a numeric registry field.
pub fn bounds_for(field: RegistryField) -> Option<Bounds> {
    match field {
        RegistryField::SystolicBp => Some(SYSTOLIC_BP),
        RegistryField::DiastolicBp => Some(DIASTOLIC_BP),
        RegistryField::Hba1c => Some(HBA1C),
        RegistryField::Age => Some(AGE),
        _ => None,
    }
}

/// Parses a numeric cell and enforces the field's bounds.
pub fn check_number(cell: &CellValue, at: CellRef, issues: &mut IssueSet) -> Option<f64> {
    if cell.is_blank() {
        return None;
    }

    let Some(value) = normalize_number(cell) else {
        issues.push(IssueKind::Numeric, at.record(cell, "valor no numérico"));
        return None;
    };

    if let Some(bounds) = bounds_for(at.field)
        && !bounds.contains(value)
    {
        issues.push(
            IssueKind::Numeric,
            at.record(
                cell,
                format!("fuera de rango [{}, {}]", bounds.min, bounds.max),
            ),
        );
        return None;
    }

    Some(value)
}

/// Age in whole years; fractional ages truncate.
pub fn check_age(cell: &CellValue, at: CellRef, issues: &mut IssueSet) -> Option<i32> {
    check_number(cell, at, issues).map(|age| age.trunc() as i32)
}
