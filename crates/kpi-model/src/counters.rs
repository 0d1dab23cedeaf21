//! KPI counters, population denominators and derived indicators.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Running totals for every indicator computed from registry rows.
///
/// A single row contributes 0 or 1 to each counter; groups and the grand
/// total are plain sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KpiCounters {
    /// HTA 18-69 with BP < 140/90 measured recently.
    pub hta_controlled: u64,
    pub hta_over_60_numerator: u64,
    pub hta_over_60_denominator: u64,
    pub hta_under_60_numerator: u64,
    /// HTA 18-59 found in the registry file.
    pub hta_under_60_denominator: u64,
    pub dm_controlled_numerator: u64,
    pub dm_controlled_denominator: u64,
    /// DM 18-69 found in the registry file.
    pub dm_captured: u64,
    pub creatinine_numerator: u64,
    pub creatinine_denominator: u64,
    pub hba1c_screened: u64,
    pub microalbuminuria_screened: u64,
    /// BP date on record but outside the control window.
    pub non_adherent: u64,
}

impl KpiCounters {
    /// (numerator, denominator) of every denominator-gated family.
    pub fn families(&self) -> [(&'static str, u64, u64); 4] {
        [
            (
                "hta_over_60",
                self.hta_over_60_numerator,
                self.hta_over_60_denominator,
            ),
            (
                "hta_under_60",
                self.hta_under_60_numerator,
                self.hta_under_60_denominator,
            ),
            (
                "dm_controlled",
                self.dm_controlled_numerator,
                self.dm_controlled_denominator,
            ),
            (
                "creatinine",
                self.creatinine_numerator,
                self.creatinine_denominator,
            ),
        ]
    }

    pub fn numerators_within_denominators(&self) -> bool {
        self.families().iter().all(|(_, num, den)| num <= den)
    }
}

impl AddAssign for KpiCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.hta_controlled += rhs.hta_controlled;
        self.hta_over_60_numerator += rhs.hta_over_60_numerator;
        self.hta_over_60_denominator += rhs.hta_over_60_denominator;
        self.hta_under_60_numerator += rhs.hta_under_60_numerator;
        self.hta_under_60_denominator += rhs.hta_under_60_denominator;
        self.dm_controlled_numerator += rhs.dm_controlled_numerator;
        self.dm_controlled_denominator += rhs.dm_controlled_denominator;
        self.dm_captured += rhs.dm_captured;
        self.creatinine_numerator += rhs.creatinine_numerator;
        self.creatinine_denominator += rhs.creatinine_denominator;
        self.hba1c_screened += rhs.hba1c_screened;
        self.microalbuminuria_screened += rhs.microalbuminuria_screened;
        self.non_adherent += rhs.non_adherent;
    }
}

impl Add for KpiCounters {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

/// Expected HTA and DM patients declared by the population table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PopulationEntry {
    pub hta: u64,
    pub dm: u64,
}

impl AddAssign for PopulationEntry {
    fn add_assign(&mut self, rhs: Self) {
        self.hta += rhs.hta;
        self.dm += rhs.dm;
    }
}

/// Ratios derived from counters; `None` when the denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Indicators {
    /// Controlled HTA over the declared HTA population.
    pub hta_general: Option<f64>,
    pub hta_under_60: Option<f64>,
    pub hta_over_60: Option<f64>,
    /// Captured DM over the declared DM population.
    pub dm_capture: Option<f64>,
    pub dm_control: Option<f64>,
    pub creatinine: Option<f64>,
    pub hba1c_screening: Option<f64>,
    pub microalbuminuria_screening: Option<f64>,
    /// Non-adherent patients over registry rows.
    pub non_adherence: Option<f64>,
}

impl Indicators {
    pub fn compute(counters: &KpiCounters, population: &PopulationEntry, rows: u64) -> Self {
        let dm_den = counters.dm_controlled_denominator;
        Self {
            hta_general: ratio(counters.hta_controlled, population.hta),
            hta_under_60: ratio(
                counters.hta_under_60_numerator,
                counters.hta_under_60_denominator,
            ),
            hta_over_60: ratio(
                counters.hta_over_60_numerator,
                counters.hta_over_60_denominator,
            ),
            dm_capture: ratio(counters.dm_captured, population.dm),
            dm_control: ratio(counters.dm_controlled_numerator, dm_den),
            creatinine: ratio(
                counters.creatinine_numerator,
                counters.creatinine_denominator,
            ),
            hba1c_screening: ratio(counters.hba1c_screened, dm_den),
            microalbuminuria_screening: ratio(counters.microalbuminuria_screened, dm_den),
            non_adherence: ratio(counters.non_adherent, rows),
        }
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// Formats a ratio as a percentage with one decimal.
///
/// Zero renders as `0%`; a missing or non-finite ratio renders as `N/A`.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v == 0.0 => "0%".to_string(),
        Some(v) if v.is_finite() => format!("{:.1}%", v * 100.0),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_assign_sums_every_counter() {
        let one = KpiCounters {
            hta_controlled: 1,
            non_adherent: 1,
            creatinine_denominator: 1,
            ..KpiCounters::default()
        };
        let mut total = KpiCounters::default();
        total += one;
        total += one;
        assert_eq!(total.hta_controlled, 2);
        assert_eq!(total.non_adherent, 2);
        assert_eq!(total.creatinine_denominator, 2);
        assert_eq!(total.dm_captured, 0);
    }

    #[test]
    fn test_indicators_zero_denominator() {
        let counters = KpiCounters {
            hta_controlled: 3,
            dm_controlled_numerator: 1,
            dm_controlled_denominator: 4,
            ..KpiCounters::default()
        };
        let population = PopulationEntry { hta: 6, dm: 0 };
        let indicators = Indicators::compute(&counters, &population, 10);
        assert_eq!(indicators.hta_general, Some(0.5));
        assert_eq!(indicators.dm_capture, None);
        assert_eq!(indicators.dm_control, Some(0.25));
        assert_eq!(indicators.hta_over_60, None);
        assert_eq!(indicators.non_adherence, Some(0.0));
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(0.0)), "0%");
        assert_eq!(format_percent(Some(0.1234)), "12.3%");
        assert_eq!(format_percent(Some(1.0)), "100.0%");
        assert_eq!(format_percent(None), "N/A");
        assert_eq!(format_percent(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn test_families_within_denominators() {
        let mut counters = KpiCounters {
            dm_controlled_numerator: 1,
            dm_controlled_denominator: 1,
            ..KpiCounters::default()
        };
        assert!(counters.numerators_within_denominators());
        counters.creatinine_numerator = 1;
        assert!(!counters.numerators_within_denominators());
    }
}
