//! Input decoding: uploaded bytes → [`SourceTable`].
//!
//! Workbooks (xlsx, xls, ods) are read with calamine; only the first sheet is
//! used. CSV exports are decoded with encoding auto-detection (the 給与R4 CSV
//! export is usually Shift_JIS) and parsed with the `csv` crate.
//!
//! Both paths honour a header-row offset: the export writes a title line
//! above the header, so by default the header is sheet row index 1.

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;

use crate::error::{InputResult, ParseError};
use crate::models::{Cell, SourceTable};

/// Kind of uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Workbook,
    Csv,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Workbook => write!(f, "workbook"),
            SourceFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Result of decoding with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub table: SourceTable,
    pub format: SourceFormat,
    /// Detected text encoding (CSV only).
    pub encoding: Option<String>,
    /// Name of the sheet that was read (workbook only).
    pub sheet_name: Option<String>,
    /// 0-based header row used.
    pub header_row: usize,
}

impl ParseResult {
    pub fn headers(&self) -> &[String] {
        &self.table.headers
    }

    pub fn row_count(&self) -> usize {
        self.table.len()
    }
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Sniff the container format from the first bytes.
pub fn detect_format(bytes: &[u8]) -> SourceFormat {
    if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
        SourceFormat::Workbook
    } else {
        SourceFormat::Csv
    }
}

// =============================================================================
// Workbooks
// =============================================================================

/// Read the first sheet of a workbook.
pub fn read_workbook(bytes: &[u8], header_row: usize) -> InputResult<ParseResult> {
    if bytes.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let sheet_name = sheets
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ParseError::NoSheets)?;
    let range = sheets
        .worksheet_range_at(0)
        .ok_or(ParseError::NoSheets)??;

    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|row| {
            let mut cells = vec![Cell::Empty; first_col as usize];
            cells.extend(row.iter().map(cell_from_data));
            cells
        })
        .collect();

    let table = split_header(rows, first_row as usize, header_row)?;

    Ok(ParseResult {
        table,
        format: SourceFormat::Workbook,
        encoding: None,
        sheet_name: Some(sheet_name),
        header_row,
    })
}

/// Convert a calamine value into a [`Cell`].
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if dt.is_datetime() => dt
            .as_datetime()
            .map(Cell::DateTime)
            .unwrap_or(Cell::Float(dt.as_f64())),
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("#{:?}", e)),
    }
}

/// Split positional rows into header and data.
///
/// `first_row` is the absolute index of `rows[0]`; missing leading rows are
/// treated as blank so `header_row` always refers to the sheet row.
fn split_header(
    rows: Vec<Vec<Cell>>,
    first_row: usize,
    header_row: usize,
) -> InputResult<SourceTable> {
    let total = first_row + rows.len();
    if header_row >= total {
        return Err(ParseError::HeaderRowOutOfRange {
            header_row,
            rows: total,
        });
    }

    let mut all: Vec<Vec<Cell>> = vec![Vec::new(); first_row];
    all.extend(rows);
    let mut data = all.split_off(header_row);
    let header = data.remove(0);

    let headers = header.iter().map(Cell::display).collect();

    Ok(SourceTable {
        headers,
        rows: data,
        first_data_row: header_row + 1,
    })
}

// =============================================================================
// CSV
// =============================================================================

/// Detect the encoding of raw bytes.
///
/// Valid UTF-8 wins; otherwise chardet guesses, with names normalised to
/// labels `encoding_rs` understands.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if std::str::from_utf8(bytes).is_ok() {
        return "utf-8".to_string();
    }

    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "utf-8-sig" => "utf-8".to_string(),
        "shift_jis" | "shift-jis" | "sjis" | "cp932" | "windows-31j" => "shift_jis".to_string(),
        "euc-jp" => "euc-jp".to_string(),
        "iso-2022-jp" => "iso-2022-jp".to_string(),
        "" => "shift_jis".to_string(),
        other => other.to_string(),
    }
}

/// Decode bytes to string using the specified encoding.
///
/// A byte-order mark overrides the label. Unknown labels fall back to lossy
/// UTF-8.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding_rs::Encoding::for_label(encoding.as_bytes()) {
        Some(enc) => enc.decode(bytes).0.into_owned(),
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the first non-empty line.
pub fn detect_delimiter(content: &str) -> u8 {
    let line = content
        .lines()
        .find(|l| !l.trim().is_empty())
        .unwrap_or("");

    let mut best = b',';
    let mut best_count = 0;
    for sep in [b',', b'\t', b';', b'|'] {
        let count = line.matches(sep as char).count();
        if count > best_count {
            best_count = count;
            best = sep;
        }
    }
    best
}

/// Turn each blank line outside a quoted field into an empty quoted field.
///
/// The csv reader skips empty lines; marking them keeps one record per line
/// so row numbers stay aligned with the file.
fn mark_blank_lines(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_quotes = false;
    let mut line_start = true;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if line_start && !in_quotes && (c == '\n' || c == '\r') {
            out.push_str("\"\"");
        }
        if c == '"' {
            in_quotes = !in_quotes;
        }
        out.push(c);
        line_start = !in_quotes && (c == '\n' || (c == '\r' && chars.peek() != Some(&'\n')));
    }
    out
}

/// Read a CSV export.
pub fn read_csv(bytes: &[u8], header_row: usize) -> InputResult<ParseResult> {
    if bytes.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding);
    let delimiter = detect_delimiter(&content);
    let marked = mark_blank_lines(&content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(marked.as_bytes());

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|v| if v.is_empty() { Cell::Empty } else { Cell::Text(v.to_string()) })
                .collect(),
        );
    }
    // Trailing blank lines end the data, as in a worksheet's used range
    while rows
        .last()
        .is_some_and(|row| row.iter().all(|c| matches!(c, Cell::Empty)))
    {
        rows.pop();
    }

    let table = split_header(rows, 0, header_row)?;

    Ok(ParseResult {
        table,
        format: SourceFormat::Csv,
        encoding: Some(encoding),
        sheet_name: None,
        header_row,
    })
}

// =============================================================================
// Entry Points
// =============================================================================

/// Decode bytes, dispatching on the sniffed format.
pub fn parse_bytes_auto(bytes: &[u8], header_row: usize) -> InputResult<ParseResult> {
    if bytes.is_empty() {
        return Err(ParseError::EmptyInput);
    }
    match detect_format(bytes) {
        SourceFormat::Workbook => read_workbook(bytes, header_row),
        SourceFormat::Csv => read_csv(bytes, header_row),
    }
}

/// Read and decode a file from disk.
pub fn parse_file_auto<P: AsRef<Path>>(path: P, header_row: usize) -> InputResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes, header_row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes(rows: &[&[&str]], start_row: u32) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet
                        .write_string(start_row + r as u32, c as u16, *value)
                        .unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(b"PK\x03\x04rest"), SourceFormat::Workbook);
        assert_eq!(detect_format(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1]), SourceFormat::Workbook);
        assert_eq!(detect_format("従業員コード,住所".as_bytes()), SourceFormat::Csv);
    }

    #[test]
    fn test_workbook_header_offset() {
        let bytes = workbook_bytes(
            &[&["従業員一覧"], &["従業員コード", "住所"], &["1001", "東京都渋谷区1-2-3"]],
            0,
        );
        let result = read_workbook(&bytes, 1).unwrap();

        assert_eq!(result.format, SourceFormat::Workbook);
        assert_eq!(result.sheet_name.as_deref(), Some("Sheet1"));
        assert_eq!(result.headers(), &["従業員コード".to_string(), "住所".to_string()]);
        assert_eq!(result.row_count(), 1);
        assert_eq!(result.table.cell(0, 1), &Cell::from("東京都渋谷区1-2-3"));
        assert_eq!(result.table.sheet_row(0), 3);
    }

    #[test]
    fn test_workbook_with_leading_blank_rows() {
        // Header written at sheet row 1 with row 0 left empty.
        let bytes = workbook_bytes(&[&["従業員コード"], &["1001"]], 1);
        let result = read_workbook(&bytes, 1).unwrap();
        assert_eq!(result.headers(), &["従業員コード".to_string()]);
        assert_eq!(result.row_count(), 1);
    }

    #[test]
    fn test_date_cells_honour_epoch() {
        use crate::transform::rules::normalize_date;
        use calamine::{ExcelDateTime, ExcelDateTimeType};

        let date = |is_1904| {
            let dt = ExcelDateTime::new(42383.0, ExcelDateTimeType::DateTime, is_1904);
            normalize_date(&cell_from_data(&Data::DateTime(dt)))
        };
        assert_eq!(date(false), Ok(Cell::from("2016/01/14")));
        assert_eq!(date(true), Ok(Cell::from("2020/01/15")));
    }

    #[test]
    fn test_workbook_header_out_of_range() {
        let bytes = workbook_bytes(&[&["only row"]], 0);
        let err = read_workbook(&bytes, 1).unwrap_err();
        assert!(matches!(err, ParseError::HeaderRowOutOfRange { header_row: 1, rows: 1 }));
    }

    #[test]
    fn test_garbage_workbook_is_error() {
        let err = read_workbook(b"PK\x03\x04not a zip", 1).unwrap_err();
        assert!(matches!(err, ParseError::Workbook(_)));
    }

    #[test]
    fn test_csv_header_offset() {
        let csv = "従業員一覧\n従業員コード,住所\n1001,\"東京都渋谷区1-2-3\"\n1002,\n";
        let result = read_csv(csv.as_bytes(), 1).unwrap();

        assert_eq!(result.format, SourceFormat::Csv);
        assert_eq!(result.encoding.as_deref(), Some("utf-8"));
        assert_eq!(result.headers().len(), 2);
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.table.cell(0, 1), &Cell::from("東京都渋谷区1-2-3"));
        assert_eq!(result.table.cell(1, 1), &Cell::Empty);
    }

    #[test]
    fn test_csv_keeps_blank_lines() {
        let result = read_csv(b"title\nA,B\n1,x\n\n3,y\n", 1).unwrap();
        assert_eq!(result.row_count(), 3);
        assert_eq!(result.table.cell(1, 0), &Cell::Empty);
        assert_eq!(result.table.cell(2, 0), &Cell::from("3"));
        assert_eq!(result.table.sheet_row(2), 5);
    }

    #[test]
    fn test_csv_blank_line_above_header() {
        let result = read_csv(b"title\r\n\r\nA,B\r\n1,x\r\n\r\n\r\n", 2).unwrap();
        assert_eq!(result.headers(), &["A".to_string(), "B".to_string()]);
        assert_eq!(result.row_count(), 1);
        assert_eq!(result.table.sheet_row(0), 4);
    }

    #[test]
    fn test_blank_lines_inside_quotes_untouched() {
        assert_eq!(mark_blank_lines("a\n\nb"), "a\n\"\"\nb");
        assert_eq!(mark_blank_lines("\"x\n\ny\"\n"), "\"x\n\ny\"\n");
    }

    #[test]
    fn test_shift_jis_decoding() {
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("従業員コード,住所");
        let decoded = decode_content(&bytes, "shift_jis");
        assert_eq!(decoded, "従業員コード,住所");
    }

    #[test]
    fn test_utf8_detected_without_guessing() {
        assert_eq!(detect_encoding("東京都".as_bytes()), "utf-8");
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("従業員コード".as_bytes());
        assert_eq!(decode_content(&bytes, "utf-8"), "従業員コード");
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), b',');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), b'\t');
        assert_eq!(detect_delimiter("\na;b;c"), b';');
        assert_eq!(detect_delimiter("single"), b',');
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse_bytes_auto(&[], 1), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn test_parse_file_auto() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r4.csv");
        std::fs::write(&path, "title\nA,B\n1,2\n").unwrap();

        let result = parse_file_auto(&path, 1).unwrap();
        assert_eq!(result.headers(), &["A".to_string(), "B".to_string()]);

        let missing = parse_file_auto(dir.path().join("nope.csv"), 1);
        assert!(matches!(missing, Err(ParseError::Io(_))));
    }
}
