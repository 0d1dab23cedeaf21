//! Final reporting structure handed to presentation layers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::counters::{Indicators, KpiCounters, PopulationEntry};
use crate::group::{GroupKey, normalize_label};
use crate::issue::IssueSet;
use crate::period::ReportPeriod;

/// Totals for one (department, municipality, provider) bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupResult {
    pub key: GroupKey,
    pub row_count: u64,
    pub counters: KpiCounters,
    pub population: PopulationEntry,
}

impl GroupResult {
    pub fn indicators(&self) -> Indicators {
        Indicators::compute(&self.counters, &self.population, self.row_count)
    }
}

/// Whole-file totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GrandTotal {
    pub row_count: u64,
    pub counters: KpiCounters,
    pub population: PopulationEntry,
    /// Expected registry headers that were not found.
    pub missing_headers: Vec<String>,
}

impl GrandTotal {
    pub fn indicators(&self) -> Indicators {
        Indicators::compute(&self.counters, &self.population, self.row_count)
    }
}

/// Sum over a subset of groups (for example one department).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RollUp {
    pub group_count: usize,
    pub row_count: u64,
    pub counters: KpiCounters,
    pub population: PopulationEntry,
}

impl RollUp {
    pub fn indicators(&self) -> Indicators {
        Indicators::compute(&self.counters, &self.population, self.row_count)
    }

    fn add_group(&mut self, group: &GroupResult) {
        self.group_count += 1;
        self.row_count += group.row_count;
        self.counters += group.counters;
        self.population += group.population;
    }
}

/// Output of one reporting pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiReport {
    pub period: ReportPeriod,
    pub total: GrandTotal,
    pub issues: IssueSet,
    /// Groups with registry rows, ordered by key.
    pub groups: Vec<GroupResult>,
    /// Keys declared in the population table without any registry row.
    pub unmatched_population: Vec<(GroupKey, PopulationEntry)>,
}

impl KpiReport {
    /// Distinct departments present in the registry, sorted.
    pub fn departments(&self) -> Vec<String> {
        self.groups
            .iter()
            .map(|group| group.key.department.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Groups belonging to `department` (matched after normalization).
    pub fn groups_in_department<'a>(
        &'a self,
        department: &str,
    ) -> impl Iterator<Item = &'a GroupResult> + 'a {
        let wanted = normalize_label(department);
        self.groups
            .iter()
            .filter(move |group| group.key.department == wanted)
    }

    /// Counters summed over every group of `department`.
    pub fn department_totals(&self, department: &str) -> RollUp {
        let mut rollup = RollUp::default();
        for group in self.groups_in_department(department) {
            rollup.add_group(group);
        }
        rollup
    }

    /// First group served by `provider` in `municipality`.
    pub fn find_provider(&self, provider: &str, municipality: &str) -> Option<&GroupResult> {
        let provider = normalize_label(provider);
        let municipality = normalize_label(municipality);
        self.groups
            .iter()
            .find(|group| group.key.provider == provider && group.key.municipality == municipality)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(dept: &str, mun: &str, ips: &str, rows: u64, hta: u64) -> GroupResult {
        GroupResult {
            key: GroupKey::new(dept, mun, ips),
            row_count: rows,
            counters: KpiCounters {
                hta_controlled: hta,
                ..KpiCounters::default()
            },
            population: PopulationEntry { hta: 10, dm: 5 },
        }
    }

    fn report() -> KpiReport {
        KpiReport {
            period: ReportPeriod::new(2025, 7).unwrap(),
            total: GrandTotal::default(),
            issues: IssueSet::default(),
            groups: vec![
                group("Antioquia", "Bello", "IPS A", 3, 1),
                group("Antioquia", "Medellin", "IPS B", 4, 2),
                group("Caldas", "Manizales", "IPS C", 2, 2),
            ],
            unmatched_population: Vec::new(),
        }
    }

    #[test]
    fn test_departments_sorted_unique() {
        assert_eq!(report().departments(), vec!["ANTIOQUIA", "CALDAS"]);
    }

    #[test]
    fn test_department_totals() {
        let rollup = report().department_totals("antioquia");
        assert_eq!(rollup.group_count, 2);
        assert_eq!(rollup.row_count, 7);
        assert_eq!(rollup.counters.hta_controlled, 3);
        assert_eq!(rollup.population, PopulationEntry { hta: 20, dm: 10 });
        assert_eq!(rollup.indicators().hta_general, Some(0.15));
    }

    #[test]
    fn test_unknown_department_is_empty() {
        let rollup = report().department_totals("Boyacá");
        assert_eq!(rollup, RollUp::default());
    }

    #[test]
    fn test_report_survives_json() {
        let report = report();
        let json = serde_json::to_string(&report).unwrap();
        let back: KpiReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert_eq!(back.departments(), vec!["ANTIOQUIA", "CALDAS"]);
    }

    #[test]
    fn test_find_provider() {
        let report = report();
        let found = report.find_provider("ips b", "MEDELLÍN").unwrap();
        assert_eq!(found.row_count, 4);
        assert!(report.find_provider("IPS B", "Bello").is_none());
    }
}
