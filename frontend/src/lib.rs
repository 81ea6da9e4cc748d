//! r4mk - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for converting 給与R4 employee exports into the
//! Mykomon import layout. All conversion happens in the backend.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title, export instructions)                      │
//! │  ├── UploadSection or LogsPanel                             │
//! │  └── PreviewSection (when rows converted)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Common types (LogEntry, UploadResponse, etc.)
//! - [`components`] - UI components (Hero, Upload, Preview, etc.)
//! - [`services`] - Backend communication (upload, download)

use leptos::*;
use leptos_router::*;
use wasm_bindgen::prelude::*;
use web_sys::File;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::*;

pub use types::{
    // Logs
    LogEntry, LogLevel,
    // API
    PatternWarning, ResponseMetadata, SourceInfo, UploadResponse,
    // Errors
    AppError, AppResult,
};

pub use components::*;

pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 r4mk - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (preview, set_preview) = create_signal(None::<UploadResponse>);
    let (file, set_file) = create_signal(None::<File>);
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    // Initialize SSE connection ONCE at app startup
    init_sse_logs(set_logs);

    view! {
        <div class="container">
            <Hero/>

            // Upload zone until a conversion is shown
            <Show when=move || preview.get().is_none() fallback=|| view! {}>
                <UploadSection set_preview=set_preview set_file=set_file set_logs=set_logs/>
            </Show>

            <Show when=move || !logs.get().is_empty() fallback=|| view! {}>
                <LogsPanel logs=logs set_logs=set_logs/>
            </Show>

            <Show when=move || preview.get().is_some() fallback=|| view! {}>
                <PreviewSection
                    preview=preview
                    file=file
                    set_preview=set_preview
                    set_file=set_file
                    set_logs=set_logs
                />
            </Show>
        </div>

        <Footer/>
    }
}
