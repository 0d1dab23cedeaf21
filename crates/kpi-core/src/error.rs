//! Error types for a reporting pass.

use kpi_ingest::IngestError;
use kpi_model::PeriodError;
use thiserror::Error;

/// Fatal errors that abort a pass before any result is produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading or resolving one of the input tables failed.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The report period is not a valid calendar month.
    #[error(transparent)]
    Period(#[from] PeriodError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
