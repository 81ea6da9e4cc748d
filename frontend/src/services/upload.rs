//! HTTP service for uploading an export to the backend.

use gloo_net::http::{Request, Response};
use web_sys::{File, FormData};

use crate::config::{ACCEPTED_EXTENSIONS, MAX_FILE_SIZE};
use crate::types::{AppError, AppResult, ErrorResponse, UploadResponse};

/// Check a selected file before sending it.
pub fn validate_file(name: &str, size: usize) -> AppResult<()> {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported file type: {} (expected .xlsx, .xls, .ods or .csv)",
            name
        )));
    }
    if size > MAX_FILE_SIZE {
        return Err(AppError::Validation(format!(
            "File too large: {} MB (limit {} MB)",
            size / (1024 * 1024),
            MAX_FILE_SIZE / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Extract the message from an error body, falling back to the raw text.
pub fn error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(err) => format!("Server error ({}): {}", status, err.error),
        Err(_) if body.trim().is_empty() => format!("Server error ({})", status),
        Err(_) => format!("Server error ({}): {}", status, body),
    }
}

/// POST the file as the multipart field `file`.
pub(crate) async fn post_file(file: &File, url: &str) -> AppResult<Response> {
    let form_data = FormData::new()
        .map_err(|e| AppError::Network(format!("Failed to create FormData: {:?}", e)))?;

    form_data
        .append_with_blob_and_filename("file", file, &file.name())
        .map_err(|e| AppError::Network(format!("Failed to append file: {:?}", e)))?;

    let request = Request::post(url)
        .body(form_data)
        .map_err(|e| AppError::Network(format!("Failed to build request: {}", e)))?;

    let response = request
        .send()
        .await
        .map_err(|e| AppError::Network(format!("HTTP request failed: {}", e)))?;

    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Upload(error_message(response.status(), &body)));
    }

    Ok(response)
}

/// Upload an export and get the converted preview.
pub async fn upload_file(file: &File, backend_url: &str) -> AppResult<UploadResponse> {
    validate_file(&file.name(), file.size() as usize)?;

    let url = format!("{}/api/upload", backend_url);
    let response = post_file(file, &url).await?;

    response
        .json::<UploadResponse>()
        .await
        .map_err(|e| AppError::Network(format!("Failed to parse response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "jobId": "123e4567-e89b-12d3-a456-426614174000",
            "status": "warning",
            "columns": ["NO", "従業員コード"],
            "rows": [["", "1001"]],
            "metadata": {
                "rowCount": 1,
                "previewCount": 1,
                "source": {
                    "format": "workbook",
                    "encoding": null,
                    "sheetName": "Sheet1",
                    "headerRow": 1,
                    "headers": ["従業員コード"],
                    "rowCount": 1
                },
                "warnings": [
                    {"row": 3, "field": "address", "value": "不明"}
                ]
            }
        }"#;

        let response: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "warning");
        assert_eq!(response.rows[0][1], "1001");
        assert_eq!(response.metadata.source.sheet_name.as_deref(), Some("Sheet1"));
        assert_eq!(response.metadata.warnings[0].row, 3);
    }

    #[test]
    fn test_validate_file() {
        assert!(validate_file("r4.xlsx", 1024).is_ok());
        assert!(validate_file("R4.XLSX", 1024).is_ok());
        assert!(validate_file("export.csv", 10).is_ok());
        assert!(matches!(validate_file("notes.txt", 10), Err(AppError::Validation(_))));
        assert!(matches!(validate_file("noext", 10), Err(AppError::Validation(_))));
        assert!(validate_file("big.xlsx", MAX_FILE_SIZE + 1).is_err());
    }

    #[test]
    fn test_error_message() {
        let body = r#"{"jobId":"x","status":"error","error":"Missing source column: 住所","columns":[],"rows":[]}"#;
        assert_eq!(error_message(422, body), "Server error (422): Missing source column: 住所");
        assert_eq!(error_message(500, ""), "Server error (500)");
        assert_eq!(error_message(502, "Bad Gateway"), "Server error (502): Bad Gateway");
    }
}
