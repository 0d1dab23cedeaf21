//! Numeric cell normalization.
//!
//! Registry exports mix decimal conventions (`7,5` and `7.5`), so the
//! separator is inferred per value.

use kpi_model::CellValue;

/// Parse a string value to `f64`, tolerating comma and dot decimals.
///
/// - Both `,` and `.` present: the later one is the decimal point and the
///   earlier one is a thousands separator (`1.234,56`, `1,234.56`).
/// - Only `,` present: it is the decimal point (`7,5`).
/// - Spaces, non-breaking spaces and a trailing `%` are ignored.
///
/// Returns None if the value cannot be parsed as a finite number.
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{a0}')
        .collect();
    let cleaned = cleaned.strip_suffix('%').unwrap_or(&cleaned);

    if cleaned.is_empty() {
        return None;
    }

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');
    let canonical = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) if comma > dot => {
            cleaned.replace('.', "").replacen(',', ".", 1)
        }
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned.to_string(),
    };

    canonical.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Best-effort numeric value of a raw cell.
pub fn normalize_number(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(value) if value.is_finite() => Some(*value),
        CellValue::Text(text) => parse_number(text),
        _ => None,
    }
}

/// Population count of a raw cell; anything unparsable counts as zero.
///
/// Negative counts clamp to zero. Fractions are kept so duplicate rows can
/// be summed before rounding.
pub fn normalize_count(cell: &CellValue) -> f64 {
    normalize_number(cell).map_or(0.0, |n| n.max(0.0))
}
