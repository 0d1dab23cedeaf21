//! Terminal tables for KPI reports.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use kpi_ingest::{ColumnSpec, PopulationField, RegistryField};
use kpi_model::{
    GroupResult, Indicators, IssueKind, IssueRecord, KpiReport, PopulationEntry, format_percent,
};

/// Issue rows listed per kind before the remainder is summarized.
pub const ISSUE_SAMPLE_LIMIT: usize = 10;

const INDICATOR_HEADERS: [&str; 9] = [
    "HTA",
    "HTA <60",
    "HTA >=60",
    "DM capt.",
    "DM ctrl.",
    "Creat.",
    "HbA1c",
    "Microalb.",
    "Inasist.",
];

/// Render the full text summary of a report.
///
/// With `department`, only that department's groups are listed and the
/// total row is the department roll-up.
pub fn render_report(report: &KpiReport, department: Option<&str>) -> String {
    let mut out = String::new();
    out.push_str(&format!("Period: {}\n", report.period.label()));
    out.push_str(&format!(
        "Rows: {}  Groups: {}  Issues: {}\n",
        report.total.row_count,
        report.groups.len(),
        report.issues.len()
    ));
    if let Some(name) = department {
        out.push_str(&format!("Department: {name}\n"));
    }
    out.push_str(&indicator_table(report, department).to_string());
    out.push('\n');

    let issues = issue_count_table(report);
    out.push_str("\nIssues:\n");
    out.push_str(&issues.to_string());
    out.push('\n');
    if !report.issues.is_empty() {
        out.push_str(&issue_sample_table(report).to_string());
        out.push('\n');
    }

    if !report.total.missing_headers.is_empty() {
        out.push_str("\nMissing registry columns:\n");
        for header in &report.total.missing_headers {
            out.push_str(&format!("- {header}\n"));
        }
    }
    if !report.unmatched_population.is_empty() {
        out.push_str("\nPopulation groups without registry rows:\n");
        for (key, entry) in &report.unmatched_population {
            out.push_str(&format!("- {key} (HTA {}, DM {})\n", entry.hta, entry.dm));
        }
    }
    out
}

/// One row per group followed by a bold total row.
pub fn indicator_table(report: &KpiReport, department: Option<&str>) -> Table {
    let mut table = Table::new();
    let mut header = vec![
        header_cell("Department"),
        header_cell("Municipality"),
        header_cell("Provider"),
        header_cell("Rows"),
        header_cell("Pop. HTA"),
        header_cell("Pop. DM"),
    ];
    header.extend(INDICATOR_HEADERS.into_iter().map(header_cell));
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in 3..15 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let groups: Vec<&GroupResult> = match department {
        Some(name) => report.groups_in_department(name).collect(),
        None => report.groups.iter().collect(),
    };
    for group in groups {
        let mut row = vec![
            Cell::new(&group.key.department),
            Cell::new(&group.key.municipality),
            Cell::new(&group.key.provider)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(group.row_count),
        ];
        row.extend(population_cells(group.population));
        row.extend(indicator_cells(&group.indicators()));
        table.add_row(row);
    }

    let (scope, rows, population, indicators) = match department {
        Some(name) => {
            let rollup = report.department_totals(name);
            (
                format!("{} groups", rollup.group_count),
                rollup.row_count,
                rollup.population,
                rollup.indicators(),
            )
        }
        None => (
            "All groups".to_string(),
            report.total.row_count,
            report.total.population,
            report.total.indicators(),
        ),
    };
    let mut total = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(scope)
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(rows).add_attribute(Attribute::Bold),
    ];
    total.extend(
        population_cells(population)
            .into_iter()
            .map(|cell| cell.add_attribute(Attribute::Bold)),
    );
    total.extend(
        indicator_cells(&indicators)
            .into_iter()
            .map(|cell| cell.add_attribute(Attribute::Bold)),
    );
    table.add_row(total);
    table
}

/// Issue counts per field class.
pub fn issue_count_table(report: &KpiReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Kind"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for kind in [IssueKind::Date, IssueKind::Numeric, IssueKind::Categorical] {
        let count = report.issues.get(kind).len();
        table.add_row(vec![Cell::new(kind.label()), count_cell(count, Color::Yellow)]);
    }
    table
}

fn issue_sample_table(report: &KpiReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Row"),
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Explanation"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for kind in [IssueKind::Date, IssueKind::Numeric, IssueKind::Categorical] {
        let records = report.issues.get(kind);
        for record in records.iter().take(ISSUE_SAMPLE_LIMIT) {
            table.add_row(issue_row(kind, record));
        }
        if records.len() > ISSUE_SAMPLE_LIMIT {
            table.add_row(vec![
                Cell::new(kind.label()),
                dim_cell("..."),
                dim_cell(format!("{} more", records.len() - ISSUE_SAMPLE_LIMIT)),
                dim_cell("-"),
                dim_cell("-"),
            ]);
        }
    }
    table
}

fn issue_row(kind: IssueKind, record: &IssueRecord) -> Vec<Cell> {
    let value = if record.value.is_empty() {
        dim_cell("(empty)")
    } else {
        Cell::new(&record.value)
    };
    vec![
        Cell::new(kind.label()).fg(Color::Yellow),
        Cell::new(record.row),
        Cell::new(&record.field),
        value,
        Cell::new(&record.explanation),
    ]
}

/// Canonical columns with their accepted header spellings.
pub fn fields_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Required"),
        header_cell("Accepted headers"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in RegistryField::ALL {
        table.add_row(field_row("Registry", field));
    }
    for field in PopulationField::ALL {
        table.add_row(field_row("Population", field));
    }
    table
}

fn field_row<F: ColumnSpec>(table: &str, field: F) -> Vec<Cell> {
    let required = if field.required() {
        Cell::new("yes").fg(Color::Green)
    } else {
        dim_cell("no")
    };
    let variants = field
        .variants()
        .iter()
        .filter(|variant| **variant != field.label())
        .copied()
        .collect::<Vec<_>>();
    let variants = if variants.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(variants.join(", "))
    };
    vec![
        Cell::new(table),
        Cell::new(field.label())
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(field.kind().label()),
        required,
        variants,
    ]
}

fn population_cells(population: PopulationEntry) -> [Cell; 2] {
    [Cell::new(population.hta), Cell::new(population.dm)]
}

fn indicator_cells(indicators: &Indicators) -> Vec<Cell> {
    [
        indicators.hta_general,
        indicators.hta_under_60,
        indicators.hta_over_60,
        indicators.dm_capture,
        indicators.dm_control,
        indicators.creatinine,
        indicators.hba1c_screening,
        indicators.microalbuminuria_screening,
        indicators.non_adherence,
    ]
    .into_iter()
    .map(percent_cell)
    .collect()
}

fn percent_cell(value: Option<f64>) -> Cell {
    let text = format_percent(value);
    if value.is_none() {
        dim_cell(text)
    } else {
        Cell::new(text)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(190);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
