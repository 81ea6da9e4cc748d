//! Runtime configuration and fixed output constants.
//!
//! Server settings come from `R4MK_*` environment variables (a `.env` file is
//! loaded by the binary), with CLI flags taking precedence.

/// 0-based sheet row holding the column headers. The 給与R4 export writes a
/// title line above it.
pub const DEFAULT_HEADER_ROW: usize = 1;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 20;
pub const DEFAULT_PREVIEW_ROWS: usize = 100;

/// Name of the downloaded workbook.
pub const DOWNLOAD_FILE_NAME: &str = "processed_data.xlsx";

/// Content type of the downloaded workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The single worksheet of the output workbook.
pub const SHEET_NAME: &str = "Sheet1";

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub header_row: usize,
    pub max_upload_bytes: usize,
    pub preview_rows: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            header_row: DEFAULT_HEADER_ROW,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl ServerConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`. Unset or unparsable values keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            lookup(key).and_then(|v| v.trim().parse().ok())
        }

        let defaults = Self::default();
        Self {
            port: parsed(&lookup, "R4MK_PORT").unwrap_or(defaults.port),
            header_row: parsed(&lookup, "R4MK_HEADER_ROW").unwrap_or(defaults.header_row),
            max_upload_bytes: parsed::<usize>(&lookup, "R4MK_MAX_UPLOAD_MB")
                .map(|mb| mb * 1024 * 1024)
                .unwrap_or(defaults.max_upload_bytes),
            preview_rows: parsed(&lookup, "R4MK_PREVIEW_ROWS").unwrap_or(defaults.preview_rows),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.header_row, 1);
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("R4MK_PORT", "8080"),
            ("R4MK_HEADER_ROW", "0"),
            ("R4MK_MAX_UPLOAD_MB", "5"),
            ("R4MK_PREVIEW_ROWS", " 10 "),
        ]
        .into_iter()
        .collect();
        let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.port, 8080);
        assert_eq!(config.header_row, 0);
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.preview_rows, 10);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ServerConfig::from_lookup(|k| match k {
            "R4MK_PORT" => Some("not-a-port".into()),
            "R4MK_HEADER_ROW" => Some("-1".into()),
            _ => None,
        });
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.header_row, DEFAULT_HEADER_ROW);
    }
}
