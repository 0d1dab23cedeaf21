//! Text cell normalization.

use kpi_model::{CellValue, normalize_label};

/// Normalized text of a raw cell (accents stripped, uppercase, collapsed).
///
/// Whole numbers render without a fractional part so numeric codes such as
/// provider identifiers match their textual spelling.
pub fn normalize_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Empty => String::new(),
        CellValue::Text(text) => normalize_label(text),
        CellValue::Number(value) if value.fract() == 0.0 && value.is_finite() => {
            format!("{}", *value as i64)
        }
        CellValue::Number(value) => value.to_string(),
        CellValue::Date(date) => date.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_cells() {
        assert_eq!(normalize_text(&CellValue::Text(" sí ".into())), "SI");
        assert_eq!(normalize_text(&CellValue::Empty), "");
    }

    #[test]
    fn test_number_cells() {
        assert_eq!(normalize_text(&CellValue::Number(1042.0)), "1042");
        assert_eq!(normalize_text(&CellValue::Number(2.5)), "2.5");
    }
}
