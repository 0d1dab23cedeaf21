//! Row validator: raw registry row to normalized KPI input.

use kpi_ingest::{HeaderMap, RawTable, RegistryField, normalize_text};
use kpi_model::{CellValue, GroupKey, IssueSet, KpiInput, RecencyWindow, ReportPeriod};
use tracing::trace;

use crate::checks::category::check_flag;
use crate::checks::dates::check_date;
use crate::checks::numeric::{check_age, check_number};
use crate::checks::CellRef;

/// Spreadsheet row of the first data row (the header occupies row 1).
pub const FIRST_DATA_ROW: usize = 2;

/// Spreadsheet row number for a 0-based data row index.
pub fn spreadsheet_row(index: usize) -> usize {
    index + FIRST_DATA_ROW
}

/// A registry row after normalization and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub key: GroupKey,
    pub input: KpiInput,
    /// Issues raised by this row only.
    pub issues: IssueSet,
}

/// Validates rows of one registry table against a report period.
///
/// Rows are independent: validating row `i` never looks at any other row,
/// so callers may validate shards of the table in parallel.
#[derive(Debug, Clone, Copy)]
pub struct RowValidator<'a> {
    table: &'a RawTable,
    columns: &'a HeaderMap<RegistryField>,
    period: ReportPeriod,
}

impl<'a> RowValidator<'a> {
    pub fn new(
        table: &'a RawTable,
        columns: &'a HeaderMap<RegistryField>,
        period: ReportPeriod,
    ) -> Self {
        Self {
            table,
            columns,
            period,
        }
    }

    pub fn period(&self) -> ReportPeriod {
        self.period
    }

    /// Number of data rows available.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn cell(&self, index: usize, field: RegistryField) -> &'a CellValue {
        self.table.cell(index, self.columns.index(field))
    }

    /// Validates the data row at 0-based `index`.
    pub fn validate(&self, index: usize) -> ValidatedRow {
        let row = spreadsheet_row(index);
        let mut issues = IssueSet::default();
        let at = |field: RegistryField| CellRef::new(row, field);
        let period = &self.period;

        let key = GroupKey {
            department: normalize_text(self.cell(index, RegistryField::Department)),
            municipality: normalize_text(self.cell(index, RegistryField::Municipality)),
            provider: normalize_text(self.cell(index, RegistryField::Provider)),
        };

        let age = check_age(
            self.cell(index, RegistryField::Age),
            at(RegistryField::Age),
            &mut issues,
        );
        let hta_flag = check_flag(
            self.cell(index, RegistryField::HtaFlag),
            at(RegistryField::HtaFlag),
            &mut issues,
        );
        let dm_flag = check_flag(
            self.cell(index, RegistryField::DmFlag),
            at(RegistryField::DmFlag),
            &mut issues,
        );

        let mut number =
            |field: RegistryField| check_number(self.cell(index, field), at(field), &mut issues);
        let systolic_bp = number(RegistryField::SystolicBp);
        let diastolic_bp = number(RegistryField::DiastolicBp);
        let hba1c = number(RegistryField::Hba1c);

        let mut date = |field: RegistryField| {
            check_date(self.cell(index, field), at(field), period, &mut issues)
        };
        let last_bp_date = date(RegistryField::LastBpDate);
        let hba1c_date = date(RegistryField::Hba1cDate);
        let creatinine_date = date(RegistryField::CreatinineDate);
        let microalbuminuria_date = date(RegistryField::MicroalbuminuriaDate);

        let input = KpiInput {
            age,
            hta_flag,
            dm_flag,
            systolic_bp,
            diastolic_bp,
            last_bp_date,
            last_bp_date_recent: period.is_recent_opt(last_bp_date, RecencyWindow::SixMonths),
            hba1c,
            hba1c_date_recent: period.is_recent_opt(hba1c_date, RecencyWindow::SixMonths),
            creatinine_date,
            creatinine_date_recent: period
                .is_recent_opt(creatinine_date, RecencyWindow::TwelveMonths),
            microalbuminuria_date_recent: period
                .is_recent_opt(microalbuminuria_date, RecencyWindow::TwelveMonths),
        };

        if !issues.is_empty() {
            trace!(row, issues = issues.len(), "row raised validation issues");
        }

        ValidatedRow { key, input, issues }
    }

    /// Validates every row in order.
    pub fn iter(&self) -> impl Iterator<Item = ValidatedRow> + '_ {
        (0..self.len()).map(move |index| self.validate(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpi_ingest::{TableKind, read_delimited};
    use kpi_model::DiagnosisFlag;

    const HEADER: &str = "DEPARTAMENTO DE RESIDENCIA;MUNICIPIO DE RESIDENCIA;\
        NOMBRE DE LA IPS QUE HACE SEGUIMIENTO;EDAD;DX CONFIRMADO HTA;DX CONFIRMADO DM;\
        TENSION ARTERIAL SISTOLICA;TENSION ARTERIAL DIASTOLICA;\
        FECHA DE LA ULTIMA TOMA DE PRESION ARTERIAL;HEMOGLOBINA GLICOSILADA;\
        FECHA DE HEMOGLOBINA GLICOSILADA;FECHA DE CREATININA;FECHA DE MICROALBUMINURIA";

    fn table(rows: &[&str]) -> RawTable {
        let text = format!("{HEADER}\n{}\n", rows.join("\n"));
        read_delimited(&text, TableKind::Registry).unwrap()
    }

    fn columns(table: &RawTable) -> HeaderMap<RegistryField> {
        HeaderMap::resolve(&table.headers, &RegistryField::ALL, TableKind::Registry).unwrap()
    }

    #[test]
    fn test_clean_row() {
        let table = table(&[
            "Antioquia;Medellín;IPS Norte;65;SI;NO;145;85;2025-06-15;;;2024-09-01;2024-08-05",
        ]);
        let columns = columns(&table);
        let validator = RowValidator::new(&table, &columns, ReportPeriod::new(2025, 7).unwrap());
        let row = validator.validate(0);

        assert!(row.issues.is_empty());
        assert_eq!(row.key, GroupKey::new("ANTIOQUIA", "MEDELLIN", "IPS NORTE"));
        assert_eq!(row.input.age, Some(65));
        assert_eq!(row.input.hta_flag, DiagnosisFlag::Yes);
        assert_eq!(row.input.dm_flag, DiagnosisFlag::No);
        assert_eq!(row.input.systolic_bp, Some(145.0));
        assert!(row.input.last_bp_date_recent);
        assert_eq!(row.input.hba1c, None);
        assert!(!row.input.hba1c_date_recent);
        assert!(row.input.creatinine_date_recent);
        assert!(row.input.creatinine_date.is_some());
        assert!(!row.input.microalbuminuria_date_recent);
    }

    #[test]
    fn test_issues_are_attributed_to_spreadsheet_rows() {
        let table = table(&[
            "A;B;C;40;SI;NO;120;80;2025-06-15;;;;",
            "A;B;C;abc;S;NO;1450;80;2030-01-01;;;;",
        ]);
        let columns = columns(&table);
        let validator = RowValidator::new(&table, &columns, ReportPeriod::new(2025, 7).unwrap());
        let rows: Vec<ValidatedRow> = validator.iter().collect();

        assert!(rows[0].issues.is_empty());
        let issues = &rows[1].issues;
        assert_eq!(issues.numerics.len(), 2);
        assert!(issues.numerics.iter().all(|record| record.row == 3));
        assert_eq!(issues.categoricals.len(), 1);
        assert_eq!(issues.dates.len(), 1);

        let input = &rows[1].input;
        assert_eq!(input.age, None);
        assert_eq!(input.systolic_bp, None);
        assert_eq!(input.hta_flag, DiagnosisFlag::Other("S".to_string()));
        assert_eq!(input.last_bp_date, None);
        assert!(!input.last_bp_date_recent);
    }

    #[test]
    fn test_missing_clinical_columns_read_as_empty() {
        let table = read_delimited(
            "DEPARTAMENTO;MUNICIPIO;IPS;EDAD\nA;B;C;30\n",
            TableKind::Registry,
        )
        .unwrap();
        let columns = columns(&table);
        let validator = RowValidator::new(&table, &columns, ReportPeriod::new(2025, 7).unwrap());
        let row = validator.validate(0);
        assert!(row.issues.is_empty());
        assert_eq!(row.input.age, Some(30));
        assert_eq!(row.input.hta_flag, DiagnosisFlag::Missing);
        assert_eq!(row.input.systolic_bp, None);
    }
}
