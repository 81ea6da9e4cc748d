//! Error types for the conversion pipeline.
//!
//! One error enum per layer:
//!
//! - [`ParseError`] - decoding the uploaded workbook or CSV
//! - [`TransformError`] - fatal rule failures in the transformer
//! - [`ExportError`] - encoding the destination workbook
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Address and title pattern mismatches are deliberately *not* errors; they
//! are reported as [`crate::models::PatternWarning`] and leave the derived
//! fields blank.

use thiserror::Error;

// =============================================================================
// Input Decoding Errors
// =============================================================================

/// Errors while turning uploaded bytes into a source table.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Zero-byte upload.
    #[error("Input file is empty")]
    EmptyInput,

    /// The workbook container could not be opened or a sheet could not be read.
    #[error("Unreadable workbook: {0}")]
    Workbook(String),

    /// The workbook has no worksheet.
    #[error("Workbook contains no sheets")]
    NoSheets,

    /// The configured header row lies past the last row of the sheet.
    #[error("Header row {} not found: sheet has only {rows} rows", .header_row + 1)]
    HeaderRowOutOfRange { header_row: usize, rows: usize },

    /// Invalid CSV syntax.
    #[error("Invalid CSV: {0}")]
    Csv(String),
}

impl From<csv::Error> for ParseError {
    fn from(e: csv::Error) -> Self {
        ParseError::Csv(e.to_string())
    }
}

impl From<calamine::Error> for ParseError {
    fn from(e: calamine::Error) -> Self {
        ParseError::Workbook(e.to_string())
    }
}

// =============================================================================
// Transformation Errors
// =============================================================================

/// Fatal errors raised by the transformer.
///
/// Any of these aborts the whole conversion; no partial output is produced.
/// `row` is the 1-based row number as shown by spreadsheet software.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// Required source column absent from the header row.
    #[error("Missing source column: {0}")]
    MissingColumn(String),

    /// A present date value could not be parsed.
    #[error("Invalid date in column '{column}' at row {row}: '{value}'")]
    DateParse {
        row: usize,
        column: String,
        value: String,
    },

    /// A present dependents count is not an integer.
    #[error("Invalid number in column '{column}' at row {row}: '{value}'")]
    NumberParse {
        row: usize,
        column: String,
        value: String,
    },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing the destination workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Underlying xlsx writer failure.
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Table does not fit in a worksheet.
    #[error("Too many rows for a worksheet: {0}")]
    TooManyRows(usize),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::convert_bytes`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input decoding error.
    #[error("Input error: {0}")]
    Parse(#[from] ParseError),

    /// Transformation error.
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Output encoding error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Upload exceeds the configured limit.
    #[error("Upload too large: limit is {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for input decoding.
pub type InputResult<T> = Result<T, ParseError>;

/// Result type for transformation operations.
pub type TransformResult<T> = Result<T, TransformError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ParseError -> PipelineError
        let parse_err = ParseError::EmptyInput;
        let pipeline_err: PipelineError = parse_err.into();
        assert!(pipeline_err.to_string().contains("empty"));

        // TransformError -> PipelineError
        let transform_err = TransformError::MissingColumn("従業員コード".into());
        let pipeline_err: PipelineError = transform_err.into();
        assert!(pipeline_err.to_string().contains("従業員コード"));
    }

    #[test]
    fn test_date_error_names_row_and_column() {
        let err = TransformError::DateParse {
            row: 4,
            column: "入社年月日".into(),
            value: "not-a-date".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("入社年月日"));
        assert!(msg.contains("row 4"));
        assert!(msg.contains("not-a-date"));
    }

    #[test]
    fn test_header_row_is_reported_one_based() {
        let err = ParseError::HeaderRowOutOfRange { header_row: 1, rows: 1 };
        assert!(err.to_string().contains("Header row 2"));
    }

    #[test]
    fn test_server_error_wraps_pipeline_message() {
        let err: ServerError = PipelineError::from(TransformError::MissingColumn("住所".into())).into();
        assert_eq!(err.to_string(), "Transform error: Missing source column: 住所");
    }
}
