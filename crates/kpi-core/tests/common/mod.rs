//! Shared registry fixtures.

#![allow(dead_code)]

use kpi_ingest::{ColumnSpec, RawTable, RegistryField};
use kpi_model::{CellValue, ReportPeriod};

/// One registry row in canonical column order.
pub type Row<'a> = [&'a str; 13];

pub fn headers() -> Vec<String> {
    RegistryField::ALL
        .iter()
        .map(|field| field.label().to_string())
        .collect()
}

pub fn registry(rows: &[Row<'_>]) -> RawTable {
    let rows = rows
        .iter()
        .map(|row| row.iter().copied().map(CellValue::from_text).collect())
        .collect();
    RawTable::new(headers(), rows)
}

pub fn july_2025() -> ReportPeriod {
    ReportPeriod::new(2025, 7).expect("valid period")
}

/// A mixed registry covering every KPI family and a few bad cells.
pub fn sample_rows() -> Vec<Row<'static>> {
    vec![
        [
            "Antioquia", "Medellín", "IPS Norte", "65", "SI", "NO", "145", "85", "2025-06-15", "",
            "", "", "",
        ],
        [
            "ANTIOQUIA", "MEDELLIN", "ips norte", "52", "SI", "SI", "128,5", "79", "15/05/2025",
            "6,5", "2025-04-01", "2024-10-01", "2025-01-20",
        ],
        [
            "Antioquia", "Bello", "IPS Sur", "47", "sí", "SI", "150", "95", "2024-11-30", "8.0",
            "2025-03-01", "2023-05-01", "",
        ],
        [
            "Caldas", "Manizales", "IPS Centro", "abc", "S", "NO", "1450", "80", "2030-01-01", "",
            "", "", "",
        ],
        [
            "Caldas", "Manizales", "IPS Centro", "70", "SI", "NO", "120", "70", "45823", "", "",
            "", "",
        ],
        [
            "Antioquia", "Bello", "IPS Sur", "33", "NO", "SI", "", "", "", "5,9", "2025-07-31",
            "2025-07-01", "2025-07-01",
        ],
        [
            "Caldas", "Villamaría", "IPS Norte", "58", "SI", "NO", "130", "85", "2025-02-01", "",
            "", "", "",
        ],
    ]
}
