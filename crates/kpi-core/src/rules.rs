//! KPI rule engine.
//!
//! Each family is a pure predicate over a [`KpiInput`]. A row contributes 0
//! or 1 to every counter, and paired numerators are always evaluated as a
//! refinement of their denominator so a single row can never push a
//! numerator past its denominator. Absent values never satisfy a threshold.

use kpi_model::{KpiCounters, KpiInput};

/// Systolic and diastolic limits for a controlled blood pressure.
pub const BP_SYSTOLIC_LIMIT: f64 = 140.0;
pub const BP_DIASTOLIC_LIMIT: f64 = 90.0;
/// Systolic ceiling (inclusive) used for patients aged 60 and over.
pub const BP_SYSTOLIC_LIMIT_OVER_60: f64 = 149.0;
/// HbA1c range `[3, 7)` counted as controlled diabetes.
pub const HBA1C_CONTROLLED_MIN: f64 = 3.0;
pub const HBA1C_CONTROLLED_MAX: f64 = 7.0;

/// One denominator-gated family outcome for a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    pub numerator: bool,
    pub denominator: bool,
}

impl Outcome {
    /// Numerator is only counted inside the denominator.
    fn gated(denominator: bool, numerator: impl FnOnce() -> bool) -> Self {
        Self {
            denominator,
            numerator: denominator && numerator(),
        }
    }
}

fn below(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v < limit)
}

fn bp_controlled(input: &KpiInput) -> bool {
    below(input.systolic_bp, BP_SYSTOLIC_LIMIT) && below(input.diastolic_bp, BP_DIASTOLIC_LIMIT)
}

/// HTA 18-69 with BP under 140/90 measured within the control window.
pub fn hta_controlled(input: &KpiInput) -> bool {
    input.hta_flag.is_yes()
        && input.age_between(18, 69)
        && bp_controlled(input)
        && input.last_bp_date_recent
}

/// HTA patients aged 60 and over without diabetes.
pub fn hta_over_60(input: &KpiInput) -> Outcome {
    let eligible =
        input.age.is_some_and(|age| age >= 60) && input.hta_flag.is_yes() && input.dm_flag.is_no();
    Outcome::gated(eligible, || {
        input
            .systolic_bp
            .is_some_and(|v| v > 0.0 && v <= BP_SYSTOLIC_LIMIT_OVER_60)
            && input
                .diastolic_bp
                .is_some_and(|v| v > 0.0 && v < BP_DIASTOLIC_LIMIT)
            && input.last_bp_date_recent
    })
}

/// HTA patients 18-59 in the registry file.
///
/// The denominator covers ages 18 to 59 inclusive; the numerator only
/// counts patients younger than 59.
pub fn hta_under_60(input: &KpiInput) -> Outcome {
    let eligible = input.hta_flag.is_yes() && input.age_between(18, 59);
    Outcome::gated(eligible, || {
        input.age_between(18, 58) && bp_controlled(input) && input.last_bp_date_recent
    })
}

/// Diabetics with a recent HbA1c in `[3, 7)`.
pub fn dm_controlled(input: &KpiInput) -> Outcome {
    Outcome::gated(input.dm_flag.is_yes(), || {
        input.hba1c_date_recent
            && input
                .hba1c
                .is_some_and(|v| (HBA1C_CONTROLLED_MIN..HBA1C_CONTROLLED_MAX).contains(&v))
    })
}

/// Diabetics 18-69 found in the registry.
pub fn dm_captured(input: &KpiInput) -> bool {
    input.dm_flag.is_yes() && input.age_between(18, 69)
}

/// Diabetics with a creatinine on record, screened within 12 months.
pub fn creatinine(input: &KpiInput) -> Outcome {
    Outcome::gated(
        input.dm_flag.is_yes() && input.creatinine_date.is_some(),
        || input.creatinine_date_recent,
    )
}

pub fn hba1c_screened(input: &KpiInput) -> bool {
    input.dm_flag.is_yes() && input.hba1c_date_recent
}

pub fn microalbuminuria_screened(input: &KpiInput) -> bool {
    input.dm_flag.is_yes() && input.microalbuminuria_date_recent
}

/// Blood pressure recorded, but outside the control window.
pub fn non_adherent(input: &KpiInput) -> bool {
    input.last_bp_date.is_some() && !input.last_bp_date_recent
}

/// Evaluates every family for one row.
pub fn evaluate(input: &KpiInput) -> KpiCounters {
    let over_60 = hta_over_60(input);
    let under_60 = hta_under_60(input);
    let dm = dm_controlled(input);
    let creatinine = creatinine(input);

    KpiCounters {
        hta_controlled: u64::from(hta_controlled(input)),
        hta_over_60_numerator: u64::from(over_60.numerator),
        hta_over_60_denominator: u64::from(over_60.denominator),
        hta_under_60_numerator: u64::from(under_60.numerator),
        hta_under_60_denominator: u64::from(under_60.denominator),
        dm_controlled_numerator: u64::from(dm.numerator),
        dm_controlled_denominator: u64::from(dm.denominator),
        dm_captured: u64::from(dm_captured(input)),
        creatinine_numerator: u64::from(creatinine.numerator),
        creatinine_denominator: u64::from(creatinine.denominator),
        hba1c_screened: u64::from(hba1c_screened(input)),
        microalbuminuria_screened: u64::from(microalbuminuria_screened(input)),
        non_adherent: u64::from(non_adherent(input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kpi_model::DiagnosisFlag;

    fn hta_row(age: i32, sbp: f64, dbp: f64) -> KpiInput {
        KpiInput {
            age: Some(age),
            hta_flag: DiagnosisFlag::Yes,
            dm_flag: DiagnosisFlag::No,
            systolic_bp: Some(sbp),
            diastolic_bp: Some(dbp),
            last_bp_date: NaiveDate::from_ymd_opt(2025, 6, 1),
            last_bp_date_recent: true,
            ..KpiInput::default()
        }
    }

    #[test]
    fn test_hta_controlled_thresholds_are_strict() {
        assert!(hta_controlled(&hta_row(50, 139.0, 89.0)));
        assert!(!hta_controlled(&hta_row(50, 140.0, 80.0)));
        assert!(!hta_controlled(&hta_row(50, 120.0, 90.0)));
        assert!(!hta_controlled(&hta_row(70, 120.0, 80.0)));
        assert!(!hta_controlled(&hta_row(17, 120.0, 80.0)));
    }

    #[test]
    fn test_hta_controlled_requires_recent_measurement() {
        let mut row = hta_row(50, 120.0, 80.0);
        row.last_bp_date_recent = false;
        assert!(!hta_controlled(&row));
        assert!(non_adherent(&row));
    }

    #[test]
    fn test_hta_over_60_excludes_diabetics() {
        let mut row = hta_row(72, 130.0, 80.0);
        row.dm_flag = DiagnosisFlag::Yes;
        assert_eq!(hta_over_60(&row), Outcome::default());
    }

    #[test]
    fn test_hta_over_60_systolic_ceiling_inclusive() {
        let at_limit = hta_over_60(&hta_row(60, 149.0, 89.0));
        assert!(at_limit.denominator && at_limit.numerator);
        let above = hta_over_60(&hta_row(60, 150.0, 80.0));
        assert!(above.denominator && !above.numerator);
    }

    #[test]
    fn test_hta_under_60_age_edges() {
        let fifty_nine = hta_under_60(&hta_row(59, 120.0, 80.0));
        assert!(fifty_nine.denominator);
        assert!(!fifty_nine.numerator);
        let fifty_eight = hta_under_60(&hta_row(58, 120.0, 80.0));
        assert!(fifty_eight.denominator && fifty_eight.numerator);
        assert_eq!(hta_under_60(&hta_row(60, 120.0, 80.0)), Outcome::default());
    }

    #[test]
    fn test_missing_bp_never_controls() {
        let mut row = hta_row(45, 0.0, 0.0);
        row.systolic_bp = None;
        row.diastolic_bp = None;
        assert!(!hta_controlled(&row));
        assert!(!hta_under_60(&row).numerator);
    }

    #[test]
    fn test_other_flag_is_excluded() {
        let mut row = hta_row(45, 120.0, 80.0);
        row.hta_flag = DiagnosisFlag::Other("S".to_string());
        assert_eq!(evaluate(&row).hta_controlled, 0);
        assert_eq!(evaluate(&row).hta_under_60_denominator, 0);
    }

    #[test]
    fn test_creatinine_denominator_needs_a_date() {
        let mut row = KpiInput {
            dm_flag: DiagnosisFlag::Yes,
            ..KpiInput::default()
        };
        assert_eq!(creatinine(&row), Outcome::default());

        row.creatinine_date = NaiveDate::from_ymd_opt(2023, 1, 10);
        assert_eq!(
            creatinine(&row),
            Outcome {
                numerator: false,
                denominator: true
            }
        );

        row.creatinine_date_recent = true;
        assert!(creatinine(&row).numerator);
    }

    #[test]
    fn test_evaluate_dm_screening_counters() {
        let row = KpiInput {
            age: Some(55),
            dm_flag: DiagnosisFlag::Yes,
            hba1c: Some(7.0),
            hba1c_date_recent: true,
            microalbuminuria_date_recent: true,
            ..KpiInput::default()
        };
        let counters = evaluate(&row);
        assert_eq!(counters.dm_controlled_denominator, 1);
        assert_eq!(counters.dm_controlled_numerator, 0);
        assert_eq!(counters.dm_captured, 1);
        assert_eq!(counters.hba1c_screened, 1);
        assert_eq!(counters.microalbuminuria_screened, 1);
        assert_eq!(counters.non_adherent, 0);
        assert!(counters.numerators_within_denominators());
    }
}
