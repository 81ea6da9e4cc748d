//! Application configuration.
//!
//! Compile-time settings for the r4mk frontend.

/// Backend API base URL.
pub const BACKEND_URL: &str = "http://localhost:3000";

/// Maximum file size for upload (in bytes).
///
/// Matches the backend's default 20 MB limit.
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Maximum logs to keep in memory.
pub const MAX_LOG_ENTRIES: usize = 100;

/// File extensions accepted by the upload input.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["xlsx", "xls", "ods", "csv"];

/// Name of the downloaded workbook.
pub const DOWNLOAD_FILE_NAME: &str = "processed_data.xlsx";

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
