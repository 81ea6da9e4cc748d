//! Preview component: converted rows and the workbook download

use leptos::*;
use web_sys::File;

use super::logs::push_log;
use crate::services::{convert_file, save_bytes};
use crate::{LogEntry, LogLevel, UploadResponse, BACKEND_URL, DOWNLOAD_FILE_NAME, XLSX_MIME};

#[component]
pub fn PreviewSection(
    preview: ReadSignal<Option<UploadResponse>>,
    file: ReadSignal<Option<File>>,
    set_preview: WriteSignal<Option<UploadResponse>>,
    set_file: WriteSignal<Option<File>>,
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let (is_downloading, set_is_downloading) = create_signal(false);

    // Back to the upload zone
    let on_cancel = move |_| {
        set_preview.set(None);
        set_file.set(None);
        set_logs.set(vec![]);
    };

    let on_download = move |_| {
        let Some(file) = file.get() else {
            push_log(set_logs, LogLevel::Warning, "No file selected");
            return;
        };

        spawn_local(async move {
            set_is_downloading.set(true);
            push_log(set_logs, LogLevel::Info, "💾 Building workbook...");

            let result = match convert_file(&file, BACKEND_URL).await {
                Ok(bytes) => save_bytes(&bytes, DOWNLOAD_FILE_NAME, XLSX_MIME),
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => push_log(
                    set_logs,
                    LogLevel::Success,
                    format!("✅ Downloaded {}", DOWNLOAD_FILE_NAME),
                ),
                Err(e) => push_log(set_logs, LogLevel::Error, format!("❌ {}", e)),
            }

            set_is_downloading.set(false);
        });
    };

    let columns = move || preview.get().map(|p| p.columns).unwrap_or_default();
    let rows = move || preview.get().map(|p| p.rows).unwrap_or_default();

    let summary = move || {
        preview
            .get()
            .map(|p| {
                let shown = if p.metadata.preview_count < p.metadata.row_count {
                    format!(" (showing first {})", p.metadata.preview_count)
                } else {
                    String::new()
                };
                format!("{} employees{}", p.metadata.row_count, shown)
            })
            .unwrap_or_default()
    };

    view! {
        <div class="preview-section show" id="previewSection">
            <div class="preview-header">
                <div class="preview-title">"📋 Converted data"</div>
                <button class="btn btn-secondary" id="cancelBtn" on:click=on_cancel>"Cancel"</button>
            </div>

            <div class="preview-table-wrapper">
                <table class="preview-table">
                    <thead>
                        <tr>
                            {move || columns()
                                .into_iter()
                                .map(|c| view! { <th>{c}</th> })
                                .collect_view()}
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || rows().into_iter().enumerate()
                            key=|(i, _)| *i
                            children=move |(_, row)| {
                                view! {
                                    <tr>
                                        {row.into_iter().map(|cell| view! { <td>{cell}</td> }).collect_view()}
                                    </tr>
                                }
                            }
                        />
                    </tbody>
                </table>
            </div>

            <div class="preview-footer">
                <div class="preview-summary">{summary}</div>
                <button
                    class="btn btn-primary"
                    id="downloadBtn"
                    on:click=on_download
                    disabled=move || is_downloading.get()
                >
                    {move || if is_downloading.get() {
                        "⏳ Preparing..."
                    } else {
                        "Download Processed Data as Excel"
                    }}
                </button>
            </div>
        </div>
    }
}
