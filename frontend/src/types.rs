//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **Log Types** - Real-time log streaming
//! - **API Types** - Backend response structures
//! - **Error Types** - Frontend error handling

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Log Types
// =============================================================================

/// Log severity level.
///
/// Matches the backend's log levels for SSE streaming.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-info",
            LogLevel::Success => "log-success",
            LogLevel::Warning => "log-warning",
            LogLevel::Error => "log-error",
        }
    }
}

/// A single log entry.
///
/// Received via SSE from `/api/logs`, or created locally by the UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub indent: u8,
    /// Timestamp string (HH:MM:SS)
    #[serde(default)]
    pub timestamp: String,
}

// =============================================================================
// API Response Types
// =============================================================================

/// Response from the backend upload endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub job_id: String,
    /// Status: "ready", "warning"
    pub status: String,
    /// Destination header, in order.
    pub columns: Vec<String>,
    /// First converted rows as display strings.
    pub rows: Vec<Vec<String>>,
    pub metadata: ResponseMetadata,
}

/// Metadata about the conversion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub row_count: usize,
    pub preview_count: usize,
    pub source: SourceInfo,
    #[serde(default)]
    pub warnings: Vec<PatternWarning>,
}

/// The uploaded file, as the backend decoded it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    /// "workbook" or "csv"
    pub format: String,
    pub encoding: Option<String>,
    pub sheet_name: Option<String>,
    pub header_row: usize,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// A row whose address or title was left blank.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatternWarning {
    pub row: usize,
    /// "address" or "title"
    pub field: String,
    pub value: String,
}

/// Error body returned by every failing endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// =============================================================================
// Error Types
// =============================================================================

/// Frontend application errors.
#[derive(Clone, Debug, PartialEq)]
pub enum AppError {
    /// Upload or conversion rejected by the backend.
    Upload(String),
    /// Saving the converted workbook failed.
    Download(String),
    /// Network/HTTP error.
    Network(String),
    /// Selected file is not acceptable.
    Validation(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Upload(msg) => write!(f, "Upload error: {}", msg),
            AppError::Download(msg) => write!(f, "Download error: {}", msg),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, AppError>;
