//! Subcommand handlers.

use std::fs;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use kpi_core::{PipelineOptions, run_report_files};
use kpi_model::{IssueKind, KpiReport};
use tracing::{info, info_span, trace};

use crate::cli::{OutputFormatArg, ReportArgs};
use crate::logging::redact_value;
use crate::progress::BarProgress;
use crate::summary::{fields_table, render_report};

/// Run the `report` subcommand and return the computed report.
pub fn run_report(args: &ReportArgs) -> Result<KpiReport> {
    let span = info_span!(
        "report",
        registry = %args.registry.display(),
        population = %args.population.display()
    );
    let _guard = span.enter();
    let start = Instant::now();

    let mut options = PipelineOptions::new(args.year, args.month)
        .with_context(|| format!("invalid report period {}-{}", args.year, args.month))?;
    if let Some(size) = args.shard_size {
        options = options.with_shard_size(size);
    }

    let progress = if std::io::stderr().is_terminal() {
        BarProgress::new("registry")
    } else {
        BarProgress::hidden()
    };
    let result = run_report_files(&args.registry, &args.population, &options, &progress);
    progress.finish();
    let report = result.with_context(|| {
        format!(
            "failed to build report from {} and {}",
            args.registry.display(),
            args.population.display()
        )
    })?;

    log_issues(&report);
    let rendered = match args.format {
        OutputFormatArg::Table => render_report(&report, args.department.as_deref()),
        OutputFormatArg::Json => {
            let mut json =
                serde_json::to_string_pretty(&report).context("serialize report as JSON")?;
            json.push('\n');
            json
        }
    };
    match &args.output {
        Some(path) => write_output(path, &rendered)?,
        None => print!("{rendered}"),
    }

    info!(
        rows = report.total.row_count,
        groups = report.groups.len(),
        issues = report.issues.len(),
        duration_ms = start.elapsed().as_millis(),
        "report complete"
    );
    Ok(report)
}

/// Print canonical columns and accepted header spellings.
pub fn run_fields() {
    println!("{}", fields_table());
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output directory {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "report written");
    Ok(())
}

fn log_issues(report: &KpiReport) {
    for kind in [IssueKind::Date, IssueKind::Numeric, IssueKind::Categorical] {
        for issue in report.issues.get(kind) {
            trace!(
                kind = kind.label(),
                row = issue.row,
                field = %issue.field,
                value = redact_value(&issue.value),
                explanation = %issue.explanation,
                "row issue"
            );
        }
    }
}
