//! # r4mk - 給与R4 → Mykomon employee master converter
//!
//! r4mk reads the employee list exported from 給与R4 (「従業員/一覧入力」 →
//! Excel) and rewrites it into the employee import layout expected by Mykomon.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  R4 export  │────▶│   Parser    │────▶│  Transform  │────▶│   Export    │
//! │ (xlsx/csv)  │     │ (header=1)  │     │ (fixed map) │     │  (Sheet1)   │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use r4mk::{convert_file, ConvertOptions};
//!
//! let conversion = convert_file("r4.xlsx", &ConvertOptions::default()).unwrap();
//! println!("Converted {} employees", conversion.preview.table.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Environment settings and output constants
//! - [`models`] - Cells, source and destination tables
//! - [`parser`] - Workbook and CSV decoding
//! - [`transform`] - Mapping, rules and pipeline
//! - [`export`] - xlsx encoding
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Decoding
pub mod parser;

// Transformation
pub mod transform;

// Encoding
pub mod export;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ExportError, ParseError, PipelineError, ServerError, TransformError};

// =============================================================================
// Re-exports - Models & Config
// =============================================================================

pub use config::{ServerConfig, DOWNLOAD_FILE_NAME, XLSX_MIME};
pub use models::{Cell, DestinationRecord, DestinationTable, PatternWarning, SourceTable};

// =============================================================================
// Re-exports - Parsing & Export
// =============================================================================

pub use export::write_workbook;
pub use parser::{
    decode_content, detect_encoding, detect_format, parse_bytes_auto, parse_file_auto,
    read_csv, read_workbook, ParseResult, SourceFormat,
};

// =============================================================================
// Re-exports - Transform & Pipeline
// =============================================================================

pub use transform::pipeline::{
    convert_bytes, convert_file, preview_bytes, preview_file, Conversion, ConvertOptions,
    Preview, SourceInfo,
};
pub use transform::{
    lookups_description, mapping_description, transform_record, transform_table,
    DESTINATION_COLUMNS,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{error_response, UploadResponse};

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
