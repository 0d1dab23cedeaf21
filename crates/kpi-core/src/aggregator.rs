//! Per-pass accumulation of KPI counters.

use std::collections::BTreeMap;

use kpi_model::{GroupKey, IssueSet, KpiCounters};
use kpi_validate::ValidatedRow;

use crate::rules::evaluate;

/// Row count and counters accumulated for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupTally {
    pub row_count: u64,
    pub counters: KpiCounters,
}

/// Accumulator owned by exactly one pass (or one shard of a pass).
///
/// Groups are created lazily with zeroed counters. Every update is a plain
/// addition, so the final sums do not depend on row order and shards can be
/// combined with [`Aggregator::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregator {
    pub(crate) groups: BTreeMap<GroupKey, GroupTally>,
    pub(crate) total: KpiCounters,
    pub(crate) row_count: u64,
    pub(crate) issues: IssueSet,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one row's contribution to its group and to the grand total.
    pub fn add_row(&mut self, key: GroupKey, counters: KpiCounters) {
        let tally = self.groups.entry(key).or_default();
        tally.row_count += 1;
        tally.counters += counters;
        self.total += counters;
        self.row_count += 1;
    }

    /// Appends issues after the ones already collected.
    pub fn add_issues(&mut self, issues: IssueSet) {
        self.issues.extend(issues);
    }

    /// Evaluates the KPI rules for a validated row and records the result.
    pub fn add_validated(&mut self, row: ValidatedRow) {
        let counters = evaluate(&row.input);
        self.add_row(row.key, counters);
        self.add_issues(row.issues);
    }

    /// Folds `other` into `self`.
    ///
    /// Counters add; issues from `other` are appended after ours, so merging
    /// shards left to right keeps the original row order.
    pub fn merge(&mut self, other: Aggregator) {
        for (key, tally) in other.groups {
            let entry = self.groups.entry(key).or_default();
            entry.row_count += tally.row_count;
            entry.counters += tally.counters;
        }
        self.total += other.total;
        self.row_count += other.row_count;
        self.issues.extend(other.issues);
    }

    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn total(&self) -> &KpiCounters {
        &self.total
    }

    pub fn issues(&self) -> &IssueSet {
        &self.issues
    }

    pub fn group(&self, key: &GroupKey) -> Option<&GroupTally> {
        self.groups.get(key)
    }

    /// Groups in key order.
    pub fn groups(&self) -> impl Iterator<Item = (&GroupKey, &GroupTally)> {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpi_model::{IssueKind, IssueRecord};

    fn one(field: fn(&mut KpiCounters)) -> KpiCounters {
        let mut counters = KpiCounters::default();
        field(&mut counters);
        counters
    }

    #[test]
    fn test_groups_are_created_lazily() {
        let mut aggregator = Aggregator::new();
        assert_eq!(aggregator.group_count(), 0);

        let key = GroupKey::new("A", "B", "C");
        aggregator.add_row(key.clone(), one(|c| c.hta_controlled = 1));
        aggregator.add_row(key.clone(), KpiCounters::default());

        let tally = aggregator.group(&key).unwrap();
        assert_eq!(tally.row_count, 2);
        assert_eq!(tally.counters.hta_controlled, 1);
        assert_eq!(aggregator.row_count(), 2);
        assert_eq!(aggregator.total().hta_controlled, 1);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let a = GroupKey::new("A", "B", "C");
        let b = GroupKey::new("A", "B", "D");
        let rows = [
            (a.clone(), one(|c| c.dm_captured = 1)),
            (b, one(|c| c.non_adherent = 1)),
            (a, one(|c| c.hta_controlled = 1)),
        ];

        let mut single = Aggregator::new();
        for (key, counters) in rows.iter().cloned() {
            single.add_row(key, counters);
        }

        let mut left = Aggregator::new();
        let mut right = Aggregator::new();
        left.add_row(rows[0].0.clone(), rows[0].1);
        right.add_row(rows[1].0.clone(), rows[1].1);
        right.add_row(rows[2].0.clone(), rows[2].1);
        left.merge(right);

        assert_eq!(left, single);
    }

    #[test]
    fn test_merge_appends_issues_in_order() {
        let mut left = Aggregator::new();
        let mut issues = IssueSet::default();
        issues.push(IssueKind::Numeric, IssueRecord::new(2, "EDAD", "x", "valor no numérico"));
        left.add_issues(issues);

        let mut right = Aggregator::new();
        let mut issues = IssueSet::default();
        issues.push(IssueKind::Numeric, IssueRecord::new(7, "EDAD", "y", "valor no numérico"));
        right.add_issues(issues);

        left.merge(right);
        let rows: Vec<usize> = left.issues().numerics.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![2, 7]);
    }
}
