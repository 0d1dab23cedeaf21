//! KPI engine for chronic-disease registries (HTA / DM).
//!
//! A pass takes a raw registry table and a population index and produces a
//! [`kpi_model::KpiReport`]:
//!
//! 1. Resolve registry headers (missing group-key columns are fatal)
//! 2. Validate every row into a normalized input plus issue records
//! 3. Evaluate the KPI rules for the row
//! 4. Accumulate counters per group and for the grand total
//! 5. Join the population index and assemble the report
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use kpi_core::{NoProgress, PipelineOptions, run_report_files};
//!
//! let options = PipelineOptions::new(2025, 7)?.with_shard_size(5_000);
//! let report = run_report_files(
//!     Path::new("registro.csv"),
//!     Path::new("poblacion.csv"),
//!     &options,
//!     &NoProgress,
//! )?;
//! println!("{} groups", report.groups.len());
//! ```

mod aggregator;
mod assembler;
mod error;
mod pipeline;
mod progress;
pub mod rules;

// === Error Types ===
pub use error::{PipelineError, Result};

// === Aggregation ===
pub use aggregator::{Aggregator, GroupTally};
pub use assembler::assemble;

// === Pipeline ===
pub use pipeline::{
    DEFAULT_SHARD_SIZE, PipelineOptions, run_pipeline, run_pipeline_sharded, run_report_files,
    shard_ranges,
};
pub use progress::{NoProgress, ProgressObserver};
pub use rules::evaluate;
