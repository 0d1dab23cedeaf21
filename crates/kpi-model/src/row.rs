//! Normalized patient row consumed by the KPI rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Diagnosis marker (`SI` / `NO`) as recorded in the registry.
///
/// Values outside the vocabulary are kept verbatim in `Other`, so the exact
/// `SI`/`NO` comparisons of the KPI rules exclude them without coercion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosisFlag {
    Yes,
    No,
    Other(String),
    #[default]
    Missing,
}

impl DiagnosisFlag {
    /// Accepted values for a diagnosis column.
    pub const VOCABULARY: &'static [&'static str] = &["SI", "NO"];

    /// Maps an already normalized label onto the flag vocabulary.
    pub fn from_normalized(value: &str) -> Self {
        match value {
            "" => Self::Missing,
            "SI" => Self::Yes,
            "NO" => Self::No,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }

    pub fn is_no(&self) -> bool {
        matches!(self, Self::No)
    }
}

/// Typed projection of one registry row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiInput {
    pub age: Option<i32>,
    pub hta_flag: DiagnosisFlag,
    pub dm_flag: DiagnosisFlag,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    pub last_bp_date: Option<NaiveDate>,
    pub last_bp_date_recent: bool,
    pub hba1c: Option<f64>,
    pub hba1c_date_recent: bool,
    pub creatinine_date: Option<NaiveDate>,
    pub creatinine_date_recent: bool,
    pub microalbuminuria_date_recent: bool,
}

impl KpiInput {
    pub fn age_between(&self, min: i32, max: i32) -> bool {
        self.age.is_some_and(|age| age >= min && age <= max)
    }
}
