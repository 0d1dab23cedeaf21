//! One reporting pass over a registry table.
//!
//! Header resolution happens once, up front, and is the only fatal step.
//! After that every row is validated, evaluated and aggregated on its own.
//! The sharded variant splits the table into contiguous row ranges, gives
//! each range its own [`Aggregator`] and reduces them left to right, so
//! its output is identical to the sequential pass.

use std::ops::Range;
use std::path::Path;
use std::time::Instant;

use kpi_ingest::{
    HeaderMap, PopulationIndex, RawTable, RegistryField, TableKind, read_delimited_file,
};
use kpi_model::{KpiReport, ReportPeriod};
use kpi_validate::RowValidator;
use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use crate::aggregator::Aggregator;
use crate::assembler::assemble;
use crate::error::Result;
use crate::progress::{ProgressObserver, ProgressTracker};

/// Rows per shard when sharding is requested without an explicit size.
pub const DEFAULT_SHARD_SIZE: usize = 10_000;

/// Settings for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub period: ReportPeriod,
    /// Rows per shard; `None` processes the table sequentially.
    pub shard_size: Option<usize>,
}

impl PipelineOptions {
    /// Sequential pass for the report month `year`-`month`.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        Ok(Self::for_period(ReportPeriod::new(year, month)?))
    }

    pub fn for_period(period: ReportPeriod) -> Self {
        Self {
            period,
            shard_size: None,
        }
    }

    #[must_use]
    pub fn with_shard_size(mut self, shard_size: usize) -> Self {
        self.shard_size = Some(shard_size.max(1));
        self
    }
}

/// Runs a full pass over `table`.
///
/// Fails only when a group-key column is missing from the registry header.
/// Rows are processed sequentially unless `options.shard_size` is set.
pub fn run_pipeline(
    table: &RawTable,
    population: &PopulationIndex,
    options: &PipelineOptions,
    progress: &dyn ProgressObserver,
) -> Result<KpiReport> {
    match options.shard_size {
        Some(shard_size) => run_sharded(table, population, options.period, shard_size, progress),
        None => run_sequential(table, population, options.period, progress),
    }
}

/// Runs a pass with rows split into shards processed in parallel.
///
/// Uses `options.shard_size`, or [`DEFAULT_SHARD_SIZE`] when unset.
pub fn run_pipeline_sharded(
    table: &RawTable,
    population: &PopulationIndex,
    options: &PipelineOptions,
    progress: &dyn ProgressObserver,
) -> Result<KpiReport> {
    let shard_size = options.shard_size.unwrap_or(DEFAULT_SHARD_SIZE);
    run_sharded(table, population, options.period, shard_size, progress)
}

/// Loads both input files and runs a pass.
///
/// The population table is read and checked first, so a malformed
/// population file is reported before the registry is touched.
pub fn run_report_files(
    registry_path: &Path,
    population_path: &Path,
    options: &PipelineOptions,
    progress: &dyn ProgressObserver,
) -> Result<KpiReport> {
    let population = PopulationIndex::load(population_path)?;
    let table = read_delimited_file(registry_path, TableKind::Registry)?;
    info!(
        path = %registry_path.display(),
        rows = table.len(),
        columns = table.headers.len(),
        "registry loaded"
    );
    run_pipeline(&table, &population, options, progress)
}

fn resolve_columns(table: &RawTable) -> Result<HeaderMap<RegistryField>> {
    let columns = HeaderMap::resolve(&table.headers, &RegistryField::ALL, TableKind::Registry)?;
    if !columns.missing().is_empty() {
        warn!(
            missing = ?columns.missing_labels(),
            "registry is missing expected columns; their values read as empty"
        );
    }
    Ok(columns)
}

fn run_sequential(
    table: &RawTable,
    population: &PopulationIndex,
    period: ReportPeriod,
    progress: &dyn ProgressObserver,
) -> Result<KpiReport> {
    let span = info_span!("kpi_pass", period = %period.label(), rows = table.len(), shards = 1);
    let _guard = span.enter();
    let start = Instant::now();

    let columns = resolve_columns(table)?;
    let validator = RowValidator::new(table, &columns, period);
    let tracker = ProgressTracker::new(progress, table.len());

    let mut aggregator = Aggregator::new();
    for row in validator.iter() {
        aggregator.add_validated(row);
        tracker.advance(1);
    }

    Ok(finish(aggregator, population, &columns, period, &tracker, start))
}

fn run_sharded(
    table: &RawTable,
    population: &PopulationIndex,
    period: ReportPeriod,
    shard_size: usize,
    progress: &dyn ProgressObserver,
) -> Result<KpiReport> {
    let shards = shard_ranges(table.len(), shard_size);
    let span = info_span!(
        "kpi_pass",
        period = %period.label(),
        rows = table.len(),
        shards = shards.len()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let columns = resolve_columns(table)?;
    let validator = RowValidator::new(table, &columns, period);
    let tracker = ProgressTracker::new(progress, table.len());

    let aggregator = shards
        .into_par_iter()
        .map(|range| {
            let rows = range.len();
            let mut shard = Aggregator::new();
            for index in range {
                shard.add_validated(validator.validate(index));
            }
            tracker.advance(rows);
            shard
        })
        .reduce(Aggregator::new, |mut left, right| {
            left.merge(right);
            left
        });

    Ok(finish(aggregator, population, &columns, period, &tracker, start))
}

fn finish(
    aggregator: Aggregator,
    population: &PopulationIndex,
    columns: &HeaderMap<RegistryField>,
    period: ReportPeriod,
    tracker: &ProgressTracker<'_>,
    start: Instant,
) -> KpiReport {
    debug!(
        rows = aggregator.row_count(),
        groups = aggregator.group_count(),
        "aggregation complete"
    );
    let report = assemble(aggregator, population, columns.missing_labels(), period);
    tracker.finish("report assembled");
    info!(
        rows = report.total.row_count,
        groups = report.groups.len(),
        date_issues = report.issues.dates.len(),
        numeric_issues = report.issues.numerics.len(),
        categorical_issues = report.issues.categoricals.len(),
        unmatched_population = report.unmatched_population.len(),
        duration_ms = start.elapsed().as_millis(),
        "kpi pass complete"
    );
    report
}

/// Contiguous `[start, end)` row ranges of at most `shard_size` rows.
pub fn shard_ranges(rows: usize, shard_size: usize) -> Vec<Range<usize>> {
    let shard_size = shard_size.max(1);
    (0..rows)
        .step_by(shard_size)
        .map(|start| start..(start + shard_size).min(rows))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_ranges() {
        assert_eq!(shard_ranges(10, 4), vec![0..4, 4..8, 8..10]);
        assert_eq!(shard_ranges(4, 4), vec![0..4]);
        assert_eq!(shard_ranges(0, 4), Vec::<Range<usize>>::new());
        assert_eq!(shard_ranges(3, 0), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_options() {
        let options = PipelineOptions::new(2025, 7).unwrap().with_shard_size(0);
        assert_eq!(options.shard_size, Some(1));
        assert!(PipelineOptions::new(2025, 13).is_err());
    }
}
