//! Raw tables and delimited-text reading.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use kpi_model::CellValue;
use tracing::{debug, warn};

use crate::error::{IngestError, Result, TableKind};

/// Candidate delimiters, in tie-break order.
pub const DELIMITER_CANDIDATES: [u8; 4] = [b';', b',', b'\t', b'|'];

/// Headers plus positionally aligned rows of raw cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// Number of data rows (the header is not counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (`row`, `column`); short rows read as empty.
    pub fn cell(&self, row: usize, column: Option<usize>) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        column
            .and_then(|index| self.rows.get(row).and_then(|cells| cells.get(index)))
            .unwrap_or(&EMPTY)
    }
}

/// Picks the delimiter occurring most often in the first non-blank line.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();
    let mut best = DELIMITER_CANDIDATES[0];
    let mut best_count = 0usize;
    for candidate in DELIMITER_CANDIDATES {
        let count = header.bytes().filter(|b| *b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Parses delimited text (delimiter auto-detected) into a raw table.
///
/// A UTF-8 BOM is stripped and blank lines are skipped. All cells are
/// text; blank cells become [`CellValue::Empty`].
pub fn read_delimited(text: &str, table: TableKind) -> Result<RawTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let delimiter = detect_delimiter(text);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = loop {
        match records.next() {
            Some(record) => {
                let record = record?;
                if record.iter().any(|field| !field.trim().is_empty()) {
                    break record.iter().map(|field| field.trim().to_string()).collect();
                }
            }
            None => return Err(IngestError::EmptyTable { table }),
        }
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(CellValue::from_text).collect());
    }

    debug!(
        %table,
        delimiter = %char::from(delimiter).escape_default(),
        columns = headers.len(),
        rows = rows.len(),
        "parsed delimited table"
    );
    Ok(RawTable::new(headers, rows))
}

/// Reads a delimited file from disk.
///
/// Bytes that are not valid UTF-8 (for example Windows-1252 accents) are
/// replaced with U+FFFD instead of failing the whole file.
pub fn read_delimited_file(path: &Path, table: TableKind) -> Result<RawTable> {
    let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    if matches!(text, Cow::Owned(_)) {
        warn!(
            %table,
            path = %path.display(),
            "file is not valid UTF-8; invalid bytes were replaced"
        );
    }
    read_delimited(&text, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("A;B;C\n1;2;3"), b';');
        assert_eq!(detect_delimiter("A,B,C"), b',');
        assert_eq!(detect_delimiter("A\tB\tC"), b'\t');
        assert_eq!(detect_delimiter("A|B|C"), b'|');
        assert_eq!(detect_delimiter("\n\nA,B;C;D"), b';');
    }

    #[test]
    fn test_detect_delimiter_ties_prefer_semicolon() {
        assert_eq!(detect_delimiter("A;B,C"), b';');
        assert_eq!(detect_delimiter("SINGLE"), b';');
    }

    #[test]
    fn test_read_delimited_quoted_and_bom() {
        let table = read_delimited(
            "\u{feff}NOMBRE;VALOR\n\"IPS; Norte\";7,5\n\n;\nIPS Sur;\n",
            TableKind::Registry,
        )
        .unwrap();
        assert_eq!(table.headers, vec!["NOMBRE", "VALOR"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][0], CellValue::Text("IPS; Norte".into()));
        assert_eq!(table.rows[0][1], CellValue::Text("7,5".into()));
        assert_eq!(table.rows[1][1], CellValue::Empty);
    }

    #[test]
    fn test_empty_text_is_error() {
        let err = read_delimited("\n  \n", TableKind::Population).unwrap_err();
        assert!(matches!(
            err,
            IngestError::EmptyTable {
                table: TableKind::Population
            }
        ));
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let table = read_delimited("A,B,C\n1\n", TableKind::Registry).unwrap();
        assert_eq!(table.cell(0, Some(0)), &CellValue::Text("1".into()));
        assert_eq!(table.cell(0, Some(2)), &CellValue::Empty);
        assert_eq!(table.cell(0, None), &CellValue::Empty);
    }

    #[test]
    fn test_read_delimited_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "A|B\nx|y\n").unwrap();
        let table = read_delimited_file(file.path(), TableKind::Registry).unwrap();
        assert_eq!(table.headers, vec!["A", "B"]);
        assert_eq!(table.rows, vec![vec![CellValue::from("x"), CellValue::from("y")]]);
    }

    #[test]
    fn test_read_delimited_file_replaces_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"A;B\nMedell\xedn;1\nManizales;2\n").unwrap();
        let table = read_delimited_file(file.path(), TableKind::Registry).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][0], CellValue::from("Medell\u{fffd}n"));
        assert_eq!(table.rows[1][0], CellValue::from("Manizales"));
    }

    #[test]
    fn test_missing_file() {
        let err = read_delimited_file(Path::new("/nonexistent/registry.csv"), TableKind::Registry)
            .unwrap_err();
        assert!(matches!(err, IngestError::FileRead { .. }));
    }
}
