//! Row-level validation issues.
//!
//! Issues never reject a row. They are collected per field class and
//! attributed to the spreadsheet row they came from.

use serde::{Deserialize, Serialize};

/// Field class an issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Unparsable or implausible date ("fecha dudosa").
    Date,
    /// Non-numeric or physiologically implausible value.
    Numeric,
    /// Value outside the expected vocabulary.
    Categorical,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Numeric => "Numeric",
            Self::Categorical => "Categorical",
        }
    }
}

/// One flagged cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// 1-based spreadsheet row (the header is row 1).
    pub row: usize,
    pub field: String,
    /// Original cell content.
    pub value: String,
    /// Explanation, or the expected vocabulary for categorical issues.
    pub explanation: String,
}

impl IssueRecord {
    pub fn new(
        row: usize,
        field: impl Into<String>,
        value: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            row,
            field: field.into(),
            value: value.into(),
            explanation: explanation.into(),
        }
    }
}

/// The three append-only issue collections of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IssueSet {
    pub dates: Vec<IssueRecord>,
    pub numerics: Vec<IssueRecord>,
    pub categoricals: Vec<IssueRecord>,
}

impl IssueSet {
    pub fn push(&mut self, kind: IssueKind, record: IssueRecord) {
        match kind {
            IssueKind::Date => self.dates.push(record),
            IssueKind::Numeric => self.numerics.push(record),
            IssueKind::Categorical => self.categoricals.push(record),
        }
    }

    /// Appends `other` after the records already held.
    pub fn extend(&mut self, other: IssueSet) {
        self.dates.extend(other.dates);
        self.numerics.extend(other.numerics);
        self.categoricals.extend(other.categoricals);
    }

    pub fn get(&self, kind: IssueKind) -> &[IssueRecord] {
        match kind {
            IssueKind::Date => &self.dates,
            IssueKind::Numeric => &self.numerics,
            IssueKind::Categorical => &self.categoricals,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len() + self.numerics.len() + self.categoricals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_routes_by_kind() {
        let mut issues = IssueSet::default();
        issues.push(IssueKind::Date, IssueRecord::new(2, "F", "x", "bad"));
        issues.push(IssueKind::Numeric, IssueRecord::new(3, "PAS", "abc", "bad"));
        issues.push(IssueKind::Numeric, IssueRecord::new(4, "PAD", "-", "bad"));
        assert_eq!(issues.get(IssueKind::Date).len(), 1);
        assert_eq!(issues.get(IssueKind::Numeric).len(), 2);
        assert!(issues.get(IssueKind::Categorical).is_empty());
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut first = IssueSet::default();
        first.push(IssueKind::Date, IssueRecord::new(2, "F", "a", "x"));
        let mut second = IssueSet::default();
        second.push(IssueKind::Date, IssueRecord::new(9, "F", "b", "x"));
        first.extend(second);
        let rows: Vec<usize> = first.dates.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![2, 9]);
    }
}
