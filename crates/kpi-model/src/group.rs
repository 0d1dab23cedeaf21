//! Organizational group keys.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Canonicalizes a label for stable matching.
///
/// Accents are stripped (NFD, combining marks U+0300..U+036F removed), the
/// value is trimmed and uppercased, and runs of whitespace collapse to a
/// single space.
pub fn normalize_label(raw: &str) -> String {
    let stripped: String = raw
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Department, municipality and care provider of a registry row.
///
/// Components are always stored normalized, so two keys compare equal when
/// their raw labels differ only in accents, case or spacing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GroupKey {
    pub department: String,
    pub municipality: String,
    pub provider: String,
}

impl GroupKey {
    /// Builds a key from raw labels, normalizing every component.
    pub fn new(department: &str, municipality: &str, provider: &str) -> Self {
        Self {
            department: normalize_label(department),
            municipality: normalize_label(municipality),
            provider: normalize_label(provider),
        }
    }

    /// True when any component is empty after normalization.
    pub fn has_empty_component(&self) -> bool {
        self.department.is_empty() || self.municipality.is_empty() || self.provider.is_empty()
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.department, self.municipality, self.provider)
    }
}
