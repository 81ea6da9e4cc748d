//! Upload component.
//!
//! Handles file selection, upload to backend, and keeps the selected file so
//! the preview can post it again for download.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, File, HtmlInputElement};

use super::logs::push_log;
use crate::services::upload_file;
use crate::{LogEntry, LogLevel, UploadResponse, BACKEND_URL};

#[component]
pub fn UploadSection(
    set_preview: WriteSignal<Option<UploadResponse>>,
    set_file: WriteSignal<Option<File>>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (is_uploading, set_is_uploading) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Allow selecting the same file again later
        input.set_value("");

        set_error.set(None);
        set_preview.set(None);
        set_file.set(None);

        spawn_local(async move {
            set_is_uploading.set(true);
            push_log(set_logs, LogLevel::Info, format!("📤 Uploading {}...", file.name()));

            let result = upload_file(&file, BACKEND_URL).await;
            // This component unmounts once a preview is set
            set_is_uploading.set(false);

            match result {
                Ok(response) => {
                    push_log(
                        set_logs,
                        LogLevel::Success,
                        format!("✅ Converted {} employees", response.metadata.row_count),
                    );
                    if !response.metadata.warnings.is_empty() {
                        push_log(
                            set_logs,
                            LogLevel::Warning,
                            format!(
                                "⚠️ {} rows have blank address or title fields",
                                response.metadata.warnings.len()
                            ),
                        );
                    }
                    set_file.set(Some(file));
                    set_preview.set(Some(response));
                }
                Err(e) => {
                    push_log(set_logs, LogLevel::Error, format!("❌ Upload failed: {}", e));
                    set_error.set(Some(e.to_string()));
                }
            }
        });
    };

    let trigger_file_input = move |_| {
        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("fileInput"))
        {
            if let Some(html_input) = input.dyn_ref::<HtmlInputElement>() {
                html_input.click();
            }
        }
    };

    view! {
        <div class="upload-section" id="uploadZone" on:click=trigger_file_input>
            <div class="upload-icon">"📤"</div>
            <div class="upload-text">
                {move || if is_uploading.get() {
                    "⏳ 変換中..."
                } else {
                    "Excelをアップロードしてください。"
                }}
            </div>

            <Show when=move || !is_uploading.get() fallback=|| view! {}>
                <div class="upload-hint">"クリックしてファイルを選択 (.xlsx, .xls, .ods, .csv)"</div>
            </Show>

            <Show when=move || error.get().is_some() fallback=|| view! {}>
                <div class="error-message">{move || error.get().unwrap_or_default()}</div>
            </Show>

            <input
                type="file"
                id="fileInput"
                accept=".xlsx,.xls,.ods,.csv"
                style="display:none"
                on:change=on_file_change
                on:click=|ev| ev.stop_propagation()
            />
        </div>
    }
}
