//! Date cell normalization.
//!
//! Spreadsheet dates arrive as native dates, Excel serial numbers, or text in
//! ISO or day-first layouts. Anything else yields `None`; the validator
//! decides whether that is worth an issue.

use chrono::{Duration, NaiveDate};
use kpi_model::CellValue;

/// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Text layouts accepted for the date part, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Converts an Excel serial day number (1900 date system) into a date.
pub fn from_excel_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    // 1899-12-30 absorbs Excel's fictitious 1900-02-29.
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Parses a textual date, ignoring any trailing time part.
pub fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let date_part = trimmed
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    if date_part.is_empty() {
        return None;
    }

    if date_part.chars().all(|c| c.is_ascii_digit()) {
        return match date_part.len() {
            8 => NaiveDate::parse_from_str(date_part, "%Y%m%d").ok(),
            1..=7 => date_part.parse::<f64>().ok().and_then(from_excel_serial),
            _ => None,
        };
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Best-effort date value of a raw cell.
pub fn normalize_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(date) => Some(*date),
        CellValue::Number(serial) => from_excel_serial(*serial),
        CellValue::Text(text) => parse_date_text(text),
        CellValue::Empty => None,
    }
}
