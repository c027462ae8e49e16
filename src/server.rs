//! HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/upload-pdf/` | Upload a PDF (multipart field `file`), index it |
//! | `POST` | `/ask-question/` | Ask a question over the indexed document |
//! | `GET`  | `/` | Liveness check |
//!
//! # Error Contract
//!
//! Error responses carry a single human-readable detail string:
//!
//! ```json
//! { "detail": "Failed to process PDF: ..." }
//! ```
//!
//! Boundary validation failures (missing multipart field, blank question)
//! return 400; pipeline failures (parse, embedding, store, chat) return 500.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::answer;
use crate::chat::ChatClient;
use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::ingest;
use crate::models::Answer;
use crate::store::VectorStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    embedder: Arc<EmbeddingClient>,
    chat: Arc<ChatClient>,
    store: Arc<VectorStore>,
}

/// Starts the HTTP server.
///
/// All outbound clients are constructed up front, so a missing API key or
/// unusable Qdrant URL fails here with a clear diagnostic instead of on the
/// first request. Runs until the process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let max_upload_bytes = config.server.max_upload_bytes;

    let embedder = Arc::new(EmbeddingClient::new(&config.openai, &config.embedding)?);
    let chat = Arc::new(ChatClient::new(&config.openai, &config.chat)?);
    let store = Arc::new(VectorStore::connect(&config.qdrant, embedder.dims())?);

    let state = AppState {
        config: Arc::new(config.clone()),
        embedder,
        chat,
        store,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/upload-pdf/", post(handle_upload))
        .route("/ask-question/", post(handle_ask))
        .route("/", get(handle_health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .with_state(state);

    tracing::info!(bind = %bind_addr, "server listening");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error body: a single human-readable detail string.
#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(detail: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        detail: detail.into(),
    }
}

fn internal(detail: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        detail: detail.into(),
    }
}

/// Maps answering-pipeline errors to a status: validation complaints are
/// the client's fault, everything else is a dependency failure.
fn classify_answer_error(err: anyhow::Error) -> AppError {
    let msg = format!("{:#}", err);

    if msg.contains("must not be empty") {
        bad_request(msg)
    } else {
        internal(format!("Failed to retrieve answer: {}", msg))
    }
}

// ============ POST /upload-pdf/ ============

#[derive(Serialize)]
struct UploadResponse {
    message: String,
}

/// Handler for `POST /upload-pdf/`.
///
/// Spools the uploaded bytes to a scoped temporary file and runs the
/// ingestion pipeline on it. The temporary file is removed on all paths
/// when it drops.
async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| bad_request(format!("failed to read upload: {}", e)))?;
            file_bytes = Some(data);
            break;
        }
    }

    let bytes = file_bytes.ok_or_else(|| bad_request("multipart field 'file' is required"))?;

    let mut temp_file = tempfile::NamedTempFile::new()
        .map_err(|e| internal(format!("Failed to process PDF: {}", e)))?;
    temp_file
        .write_all(&bytes)
        .map_err(|e| internal(format!("Failed to process PDF: {}", e)))?;

    let report = ingest::ingest_pdf_file(
        &state.config,
        &state.embedder,
        &state.store,
        temp_file.path(),
    )
    .await
    .map_err(|e| internal(format!("Failed to process PDF: {:#}", e)))?;

    tracing::info!(
        chunks = report.chunks,
        collection = %report.collection,
        "upload indexed"
    );

    Ok(Json(UploadResponse {
        message: "PDF successfully processed and stored in vector DB".to_string(),
    }))
}

// ============ POST /ask-question/ ============

#[derive(Deserialize)]
struct QuestionRequest {
    question: String,
}

#[derive(Serialize)]
struct AskResponse {
    answer: String,
}

/// Handler for `POST /ask-question/`.
async fn handle_ask(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<AskResponse>, AppError> {
    let outcome = answer::answer_question(
        &state.config,
        &state.embedder,
        &state.chat,
        &state.store,
        &request.question,
    )
    .await
    .map_err(classify_answer_error)?;

    let text = match outcome {
        Answer::Generated(text) => text,
        Answer::NotIndexed => answer::NOT_INDEXED_ANSWER.to_string(),
    };

    Ok(Json(AskResponse { answer: text }))
}

// ============ GET / ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

/// Handler for `GET /`. No external dependencies are touched.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Success".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_question_maps_to_bad_request() {
        let err = classify_answer_error(anyhow::anyhow!("question must not be empty"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn pipeline_failures_map_to_internal_error() {
        let err = classify_answer_error(anyhow::anyhow!("Chat API error 503: unavailable"));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.detail.starts_with("Failed to retrieve answer:"));
    }

    #[test]
    fn health_payload_shape_is_fixed() {
        let body = serde_json::to_value(HealthResponse {
            status: "Success".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"status": "Success"}));
    }
}
