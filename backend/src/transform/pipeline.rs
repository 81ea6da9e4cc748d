//! High-level pipeline API: uploaded bytes → converted workbook.
//!
//! Combines decoding, transformation and export, logging each stage through
//! the log broadcaster so SSE clients can follow along.
//!
//! # Example
//!
//! ```rust,ignore
//! use r4mk::{convert_file, ConvertOptions};
//!
//! let conversion = convert_file("r4_export.xlsx", &ConvertOptions::default())?;
//! std::fs::write("processed_data.xlsx", &conversion.workbook)?;
//! ```

use serde::Serialize;
use std::path::Path;

use crate::api::logs::{log_error, log_info, log_info_indent, log_success, log_warning};
use crate::config::{DEFAULT_HEADER_ROW, DEFAULT_PREVIEW_ROWS};
use crate::error::{PipelineResult, TransformError};
use crate::export::write_workbook;
use crate::models::{DestinationTable, PatternWarning};
use crate::parser::{parse_bytes_auto, ParseResult, SourceFormat};

use super::executor::{missing_columns, transform_table};

/// Mismatch warnings logged individually before summarising.
const LOGGED_WARNINGS: usize = 5;

/// Options for the conversion pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// 0-based sheet row holding the headers.
    pub header_row: usize,
    /// Rows included in previews.
    pub preview_rows: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            header_row: DEFAULT_HEADER_ROW,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Metadata about the decoded upload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub format: SourceFormat,
    pub encoding: Option<String>,
    pub sheet_name: Option<String>,
    pub header_row: usize,
    pub headers: Vec<String>,
    pub row_count: usize,
}

impl From<&ParseResult> for SourceInfo {
    fn from(parsed: &ParseResult) -> Self {
        Self {
            format: parsed.format,
            encoding: parsed.encoding.clone(),
            sheet_name: parsed.sheet_name.clone(),
            header_row: parsed.header_row,
            headers: parsed.headers().to_vec(),
            row_count: parsed.row_count(),
        }
    }
}

/// Converted table without the encoded workbook.
#[derive(Debug, Clone)]
pub struct Preview {
    pub table: DestinationTable,
    pub warnings: Vec<PatternWarning>,
    pub source: SourceInfo,
    pub preview_rows: usize,
}

impl Preview {
    /// The first `preview_rows` rows as display strings.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.table.display_rows(self.preview_rows)
    }
}

/// Result of a complete conversion
#[derive(Debug, Clone)]
pub struct Conversion {
    pub preview: Preview,
    /// xlsx bytes of the destination workbook.
    pub workbook: Vec<u8>,
}

/// Decode and transform, without encoding the output.
pub fn preview_bytes(bytes: &[u8], options: &ConvertOptions) -> PipelineResult<Preview> {
    log_info("📖 Reading uploaded file...");
    let parsed = match parse_bytes_auto(bytes, options.header_row) {
        Ok(p) => p,
        Err(e) => {
            log_error(format!("Could not read input: {}", e));
            return Err(e.into());
        }
    };
    log_source(&parsed);

    log_info("⚙️ Converting rows...");
    let output = match transform_table(&parsed.table) {
        Ok(o) => o,
        Err(e) => {
            log_transform_error(&parsed, &e);
            return Err(e.into());
        }
    };

    if output.table.is_empty() {
        log_warning("No employee rows found; output will contain the header only");
    }
    log_pattern_warnings(&output.warnings);
    log_success(format!("Converted {} rows", output.table.len()));

    Ok(Preview {
        source: SourceInfo::from(&parsed),
        table: output.table,
        warnings: output.warnings,
        preview_rows: options.preview_rows,
    })
}

/// Decode, transform and encode the destination workbook.
pub fn convert_bytes(bytes: &[u8], options: &ConvertOptions) -> PipelineResult<Conversion> {
    let preview = preview_bytes(bytes, options)?;

    log_info("💾 Writing workbook...");
    let workbook = match write_workbook(&preview.table) {
        Ok(w) => w,
        Err(e) => {
            log_error(format!("Could not write workbook: {}", e));
            return Err(e.into());
        }
    };
    log_success(format!("Workbook ready ({} bytes)", workbook.len()));

    Ok(Conversion { preview, workbook })
}

/// Convert a file from disk.
pub fn convert_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> PipelineResult<Conversion> {
    let bytes = std::fs::read(path.as_ref()).map_err(crate::error::ParseError::from)?;
    convert_bytes(&bytes, options)
}

/// Preview a file from disk.
pub fn preview_file<P: AsRef<Path>>(path: P, options: &ConvertOptions) -> PipelineResult<Preview> {
    let bytes = std::fs::read(path.as_ref()).map_err(crate::error::ParseError::from)?;
    preview_bytes(&bytes, options)
}

fn log_source(parsed: &ParseResult) {
    match parsed.format {
        SourceFormat::Workbook => log_success(format!(
            "Detected workbook, sheet '{}'",
            parsed.sheet_name.as_deref().unwrap_or("?")
        )),
        SourceFormat::Csv => log_success(format!(
            "Detected CSV, encoding {}",
            parsed.encoding.as_deref().unwrap_or("?")
        )),
    }
    log_success(format!(
        "Read {} rows, {} columns (header row {})",
        parsed.row_count(),
        parsed.headers().len(),
        parsed.header_row + 1
    ));
}

fn log_transform_error(parsed: &ParseResult, error: &TransformError) {
    match error {
        TransformError::MissingColumn(_) => {
            let missing = missing_columns(&parsed.table);
            log_error(format!("{} required columns missing", missing.len()));
            for name in missing {
                log_info_indent(name, 1);
            }
        }
        other => log_error(other.to_string()),
    }
}

fn log_pattern_warnings(warnings: &[PatternWarning]) {
    for warning in warnings.iter().take(LOGGED_WARNINGS) {
        log_warning(warning.to_string());
    }
    if warnings.len() > LOGGED_WARNINGS {
        log_warning(format!(
            "... and {} more rows with blank address or title fields",
            warnings.len() - LOGGED_WARNINGS
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, PipelineError};
    use crate::models::Cell;
    use crate::transform::executor::tests::{employee_row, sample_headers, sample_row};
    use crate::transform::mapping::SourceField;

    fn csv_bytes(rows: &[Vec<Cell>]) -> Vec<u8> {
        let mut out = String::from("従業員一覧\n");
        out.push_str(&sample_headers().join(","));
        out.push('\n');
        for row in rows {
            let line: Vec<String> = row.iter().map(Cell::display).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out.into_bytes()
    }

    #[test]
    fn test_convert_csv_upload() {
        let bytes = csv_bytes(&[employee_row(), employee_row()]);
        let conversion = convert_bytes(&bytes, &ConvertOptions::default()).unwrap();

        assert_eq!(conversion.preview.table.len(), 2);
        assert_eq!(conversion.preview.source.format, SourceFormat::Csv);
        assert_eq!(conversion.preview.source.row_count, 2);
        assert!(conversion.workbook.starts_with(b"PK"));
    }

    #[test]
    fn test_preview_limits_rows() {
        let bytes = csv_bytes(&[employee_row(), employee_row(), employee_row()]);
        let options = ConvertOptions {
            preview_rows: 2,
            ..Default::default()
        };
        let preview = preview_bytes(&bytes, &options).unwrap();
        assert_eq!(preview.table.len(), 3);
        assert_eq!(preview.display_rows().len(), 2);
    }

    #[test]
    fn test_header_only_input_is_allowed() {
        let bytes = csv_bytes(&[]);
        let conversion = convert_bytes(&bytes, &ConvertOptions::default()).unwrap();
        assert!(conversion.preview.table.is_empty());
        assert!(!conversion.workbook.is_empty());
    }

    #[test]
    fn test_missing_column_aborts() {
        let bytes = "title\n従業員コード,住所\n1,東京都渋谷区1\n".as_bytes();
        let err = convert_bytes(bytes, &ConvertOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Transform(TransformError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_empty_upload() {
        let err = convert_bytes(&[], &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(ParseError::EmptyInput)));
    }

    #[test]
    fn test_mismatch_warnings_are_returned() {
        let row = sample_row(&[(SourceField::Address, Cell::from("不明な住所"))]);
        let preview = preview_bytes(&csv_bytes(&[row]), &ConvertOptions::default()).unwrap();
        assert_eq!(preview.warnings.len(), 1);
        assert_eq!(preview.warnings[0].row, 3);
    }

    #[test]
    fn test_convert_file_missing() {
        let err = convert_file("/nonexistent/r4.xlsx", &ConvertOptions::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Parse(ParseError::Io(_))));
    }
}
