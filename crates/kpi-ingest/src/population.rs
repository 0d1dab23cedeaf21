//! Population reference table.
//!
//! The population table declares how many HTA and DM patients each
//! (department, municipality, provider) is expected to follow. It is loaded
//! once before the pass and is read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use kpi_model::{GroupKey, PopulationEntry};
use tracing::{debug, info};

use crate::columns::{HeaderMap, PopulationField};
use crate::error::{Result, TableKind};
use crate::normalize::{normalize_count, normalize_text};
use crate::table::{RawTable, read_delimited, read_delimited_file};

/// Expected populations keyed by normalized group key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PopulationIndex {
    entries: BTreeMap<GroupKey, PopulationEntry>,
}

impl PopulationIndex {
    /// Parses population text (delimiter auto-detected).
    ///
    /// Fails with [`crate::IngestError::MissingColumns`] when any required
    /// column is absent. Duplicate keys are summed; rows with an empty key
    /// component are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let table = read_delimited(text, TableKind::Population)?;
        Self::from_table(&table)
    }

    /// Loads the population table from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let table = read_delimited_file(path, TableKind::Population)?;
        let index = Self::from_table(&table)?;
        info!(
            path = %path.display(),
            groups = index.len(),
            "population table loaded"
        );
        Ok(index)
    }

    /// Builds the index from an already parsed table.
    pub fn from_table(table: &RawTable) -> Result<Self> {
        let columns = HeaderMap::resolve(
            &table.headers,
            &PopulationField::ALL,
            TableKind::Population,
        )?;
        let text_at = |row: usize, field: PopulationField| {
            normalize_text(table.cell(row, columns.index(field)))
        };
        let count_at = |row: usize, field: PopulationField| {
            normalize_count(table.cell(row, columns.index(field)))
        };

        // Fractional counts are summed per key and rounded once.
        let mut sums: BTreeMap<GroupKey, (f64, f64)> = BTreeMap::new();
        let mut skipped = 0usize;
        for row in 0..table.len() {
            let key = GroupKey {
                department: text_at(row, PopulationField::Department),
                municipality: text_at(row, PopulationField::Municipality),
                provider: text_at(row, PopulationField::Provider),
            };
            if key.has_empty_component() {
                skipped += 1;
                continue;
            }
            let sum = sums.entry(key).or_default();
            sum.0 += count_at(row, PopulationField::HtaPopulation);
            sum.1 += count_at(row, PopulationField::DmPopulation);
        }
        let entries: BTreeMap<GroupKey, PopulationEntry> = sums
            .into_iter()
            .map(|(key, (hta, dm))| {
                let entry = PopulationEntry {
                    hta: round_count(hta),
                    dm: round_count(dm),
                };
                (key, entry)
            })
            .collect();

        debug!(
            groups = entries.len(),
            skipped_rows = skipped,
            "population index built"
        );
        Ok(Self { entries })
    }

    /// Entry for `key`, zero when the key is not declared.
    pub fn get(&self, key: &GroupKey) -> PopulationEntry {
        self.entries.get(key).copied().unwrap_or_default()
    }

    pub fn contains(&self, key: &GroupKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &PopulationEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(GroupKey, PopulationEntry)> for PopulationIndex {
    fn from_iter<I: IntoIterator<Item = (GroupKey, PopulationEntry)>>(iter: I) -> Self {
        let mut entries: BTreeMap<GroupKey, PopulationEntry> = BTreeMap::new();
        for (key, entry) in iter {
            *entries.entry(key).or_default() += entry;
        }
        Self { entries }
    }
}

fn round_count(value: f64) -> u64 {
    value.round() as u64
}
