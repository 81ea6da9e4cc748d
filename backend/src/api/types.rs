//! REST API types for frontend integration.
//!
//! Preview rows are sent as display strings in destination column order, so
//! the frontend renders them without knowing the layout.

use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::PatternWarning;
use crate::transform::pipeline::{Preview, SourceInfo};

/// Response sent to frontend after upload and conversion.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "ready", "warning", "error"
    pub status: String,

    /// Destination header, in order.
    pub columns: Vec<String>,

    /// First rows of the converted table.
    pub rows: Vec<Vec<String>>,

    pub metadata: ResponseMetadata,
}

/// Metadata about the conversion
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Converted rows in the full output.
    pub row_count: usize,

    /// Rows included in `rows`.
    pub preview_count: usize,

    pub source: SourceInfo,

    /// Rows whose address or title was left blank.
    pub warnings: Vec<PatternWarning>,
}

impl From<Preview> for UploadResponse {
    fn from(preview: Preview) -> Self {
        let rows = preview.display_rows();
        let status = if preview.warnings.is_empty() {
            "ready"
        } else {
            "warning"
        };

        UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: status.to_string(),
            columns: preview.table.columns().iter().map(|c| c.to_string()).collect(),
            metadata: ResponseMetadata {
                row_count: preview.table.len(),
                preview_count: rows.len(),
                source: preview.source,
                warnings: preview.warnings,
            },
            rows,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "columns": [],
        "rows": []
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DestinationRecord, DestinationTable, PatternField};
    use crate::parser::SourceFormat;

    fn preview(warnings: Vec<PatternWarning>) -> Preview {
        Preview {
            table: DestinationTable {
                records: vec![DestinationRecord::default(); 3],
            },
            warnings,
            source: SourceInfo {
                format: SourceFormat::Workbook,
                encoding: None,
                sheet_name: Some("従業員".into()),
                header_row: 1,
                headers: vec!["従業員コード".into()],
                row_count: 3,
            },
            preview_rows: 2,
        }
    }

    #[test]
    fn test_upload_response_shape() {
        let response = UploadResponse::from(preview(Vec::new()));
        assert_eq!(response.status, "ready");
        assert_eq!(response.columns.len(), 52);
        assert_eq!(response.rows.len(), 2);
        assert_eq!(response.metadata.row_count, 3);

        let json = serde_json::to_value(&response).unwrap();
        assert!(json["jobId"].is_string());
        assert_eq!(json["metadata"]["previewCount"], 2);
        assert_eq!(json["metadata"]["source"]["format"], "workbook");
        assert_eq!(json["metadata"]["source"]["sheetName"], "従業員");
    }

    #[test]
    fn test_warnings_set_status() {
        let warning = PatternWarning {
            row: 4,
            field: PatternField::Title,
            value: "部長".into(),
        };
        let response = UploadResponse::from(preview(vec![warning]));
        assert_eq!(response.status, "warning");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["metadata"]["warnings"][0]["field"], "title");
    }

    #[test]
    fn test_error_response() {
        let json = error_response("Missing source column: 住所");
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "Missing source column: 住所");
        assert_eq!(json["rows"].as_array().map(Vec::len), Some(0));
    }
}
