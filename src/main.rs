mod config;
mod error;
mod models;
mod services;

use anyhow::Context;
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use config::Config;
use error::ConvertError;
use models::{BookMetadata, ChapterSummary, ConvertResult, SourceFile};
use services::chapterizer::extract_chapters;
use services::fb2::assemble_document;
use services::natural::sort_naturally;
use services::stamp::{DocumentStamp, SystemStamp};
use services::storage;

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    stamp: Arc<dyn DocumentStamp>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    tracing::info!("Storing books in {}", config.output_dir.display());

    let app = router(AppState {
        config: Arc::new(config),
        stamp: Arc::new(SystemStamp),
    });
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let downloads = ServeDir::new(&state.config.output_dir);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/chapters", post(list_chapters))
        .route("/convert", post(convert))
        .nest_service("/download", downloads)
        .layer(body_limit)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
}

async fn index() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>TXT to FB2 Converter</title>
    <meta charset="utf-8">
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        .endpoint { background-color: #f5f5f5; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }
    </style>
</head>
<body>
    <h1>TXT to FB2 Converter</h1>
    <p>Upload UTF-8 chapter files to build a single FictionBook 2.0 book.
       The first non-blank line of each file becomes the chapter title.</p>

    <h2>Available Endpoints:</h2>
    <div class="endpoint">GET /health - Health check</div>
    <div class="endpoint">POST /chapters - Preview chapters extracted from the uploaded files</div>
    <div class="endpoint">POST /convert - Build an FB2 book from the uploaded files</div>
    <div class="endpoint">GET /download/&lt;id&gt;.fb2 - Fetch a converted book</div>

    <h2>Form fields:</h2>
    <p><code>files</code> (repeatable), <code>title</code>, <code>author</code>,
       and <code>order=natural</code> to sort files by name instead of upload order.</p>
</body>
</html>
"#,
    )
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Multipart(e) => e.status(),
            ApiError::Convert(ConvertError::NoContent) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Convert(ConvertError::Write { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::warn!("{}", self);
        }

        let body = serde_json::json!({
            "success": false,
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Default)]
struct Upload {
    sources: Vec<SourceFile>,
    title: String,
    author: String,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ApiError> {
    let mut upload = Upload::default();
    let mut natural_order = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" => {
                let file_name = field.file_name().unwrap_or("untitled.txt").to_string();
                let data = field.bytes().await?;
                if upload.sources.iter().any(|s| s.name == file_name) {
                    tracing::debug!("Skipping repeated file {}", file_name);
                    continue;
                }
                upload.sources.push(SourceFile::from_bytes(file_name, &data));
            }
            "title" => upload.title = field.text().await?,
            "author" => upload.author = field.text().await?,
            "order" => natural_order = field.text().await?.trim() == "natural",
            other => tracing::debug!("Ignoring form field {}", other),
        }
    }

    if natural_order {
        sort_naturally(&mut upload.sources);
    }

    Ok(upload)
}

async fn list_chapters(multipart: Multipart) -> Result<Json<serde_json::Value>, ApiError> {
    let upload = read_upload(multipart).await?;
    let chapters = extract_chapters(&upload.sources);
    let summaries: Vec<ChapterSummary> = chapters.iter().map(ChapterSummary::from).collect();

    Ok(Json(serde_json::json!({
        "success": true,
        "chapter_count": summaries.len(),
        "chapters": summaries,
    })))
}

async fn convert(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ConvertResult>, ApiError> {
    let upload = read_upload(multipart).await?;
    let chapters = extract_chapters(&upload.sources);

    let meta = BookMetadata::new(&upload.title, &upload.author, state.stamp.as_ref());
    let document = assemble_document(&chapters, &meta)?;

    let stored_name = format!("{}.fb2", meta.id);
    let path = storage::write_book(&state.config.output_dir, &stored_name, &document)?;
    tracing::info!(
        "Converted {} chapters of \"{}\" to {}",
        chapters.len(),
        meta.title,
        path.display()
    );

    Ok(Json(ConvertResult {
        success: true,
        chapter_count: chapters.len(),
        file_name: storage::suggested_file_name(&meta.title),
        book_title: meta.title,
        download_url: format!("/download/{}", stored_name),
    }))
}
