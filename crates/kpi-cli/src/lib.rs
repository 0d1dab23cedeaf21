//! Command-line front end for registry KPI reports.
//!
//! The `kpi-report` binary parses arguments, installs logging and hands the
//! registry and population files to [`kpi_core::run_report_files`].

pub mod cli;
pub mod commands;
pub mod logging;
pub mod progress;
pub mod summary;
