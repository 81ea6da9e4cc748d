//! Conversion download: fetch the workbook and hand it to the browser.

use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, File, HtmlAnchorElement, Url};

use super::upload::{post_file, validate_file};
use crate::types::{AppError, AppResult};

/// Upload the file to `/api/convert` and return the workbook bytes.
pub async fn convert_file(file: &File, backend_url: &str) -> AppResult<Vec<u8>> {
    validate_file(&file.name(), file.size() as usize)?;

    let url = format!("{}/api/convert", backend_url);
    let response = post_file(file, &url).await?;

    response
        .binary()
        .await
        .map_err(|e| AppError::Network(format!("Failed to read workbook: {}", e)))
}

/// Save bytes as a file through a temporary object URL.
pub fn save_bytes(bytes: &[u8], file_name: &str, mime: &str) -> AppResult<()> {
    let download_err = |e: wasm_bindgen::JsValue| AppError::Download(format!("{:?}", e));

    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));

    let props = BlobPropertyBag::new();
    props.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &props).map_err(download_err)?;

    let url = Url::create_object_url_with_blob(&blob).map_err(download_err)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Download("No document available".to_string()))?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(download_err)?
        .dyn_into()
        .map_err(|_| AppError::Download("Could not create link".to_string()))?;

    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();

    Url::revoke_object_url(&url).map_err(download_err)?;
    log::info!("💾 Saved {} ({} bytes)", file_name, bytes.len());
    Ok(())
}
