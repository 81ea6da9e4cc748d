//! HTTP Server for the r4mk API.
//!
//! Provides REST endpoints for upload/preview and for downloading the
//! converted workbook.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/upload`     | Upload an export, get a JSON preview |
//! | POST   | `/api/convert`    | Upload an export, get the xlsx file  |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_info, LOG_BROADCASTER};
use super::types::{error_response, UploadResponse};
use crate::config::{ServerConfig, DOWNLOAD_FILE_NAME, XLSX_MIME};
use crate::error::{PipelineError, ServerError, ServerResult};
use crate::transform::pipeline::{convert_bytes, preview_bytes, ConvertOptions};

/// Allowance for multipart boundaries and part headers on top of the file.
const MULTIPART_OVERHEAD: usize = 16 * 1024;

#[derive(Debug, Clone)]
struct AppState {
    options: ConvertOptions,
    max_upload_bytes: usize,
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Pipeline(PipelineError::Parse(_)) => StatusCode::BAD_REQUEST,
            ServerError::Pipeline(PipelineError::Transform(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Pipeline(PipelineError::Export(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        eprintln!("❌ {}", self);
        (self.status_code(), Json(error_response(&self.to_string()))).into_response()
    }
}

/// Build the application router.
pub fn router(config: &ServerConfig) -> Router {
    let state = AppState {
        options: ConvertOptions {
            header_row: config.header_row,
            preview_rows: config.preview_rows,
        },
        max_upload_bytes: config.max_upload_bytes,
    };

    // Permissive CORS for the frontend dev server
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/convert", post(convert))
        .route("/api/logs", get(sse_logs))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes + MULTIPART_OVERHEAD))
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(&config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    println!("🚀 r4mk server running on http://localhost:{}", config.port);
    println!("   POST /api/upload  - Upload export, JSON preview");
    println!("   POST /api/convert - Upload export, download {}", DOWNLOAD_FILE_NAME);
    println!("   GET  /api/logs    - SSE log stream");
    println!("   GET  /health      - Health check");
    println!();
    println!(
        "   Header row: {}, upload limit: {} MB",
        config.header_row + 1,
        config.max_upload_bytes / (1024 * 1024)
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "r4mk",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "convert": "POST /api/convert",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn multipart_error(e: MultipartError, limit: usize) -> ServerError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge { limit }
    } else {
        ServerError::BadRequest(format!("Multipart error: {}", e))
    }
}

/// Pull the `file` field out of the form.
async fn read_file_field(state: &AppState, mut multipart: Multipart) -> ServerResult<Vec<u8>> {
    let limit = state.max_upload_bytes;
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| multipart_error(e, limit))?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".into()))?;
    if bytes.len() > limit {
        return Err(ServerError::PayloadTooLarge { limit });
    }

    log_info(format!(
        "📄 New upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    ));
    Ok(bytes)
}

/// Upload endpoint: JSON preview of the converted rows
async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ServerResult<Json<UploadResponse>> {
    let bytes = read_file_field(&state, multipart).await?;
    let options = state.options.clone();

    let preview = tokio::task::spawn_blocking(move || preview_bytes(&bytes, &options))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    Ok(Json(UploadResponse::from(preview)))
}

/// Convert endpoint: the workbook as an attachment
async fn convert(State(state): State<AppState>, multipart: Multipart) -> ServerResult<Response> {
    let bytes = read_file_field(&state, multipart).await?;
    let options = state.options.clone();

    let conversion = tokio::task::spawn_blocking(move || convert_bytes(&bytes, &options))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))??;

    let headers = [
        (header::CONTENT_TYPE, XLSX_MIME.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
        ),
    ];
    Ok((headers, conversion.workbook).into_response())
}
