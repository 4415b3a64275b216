//! HTTP server for the quoteflow API.
//!
//! Receives bucket notifications over HTTP and runs the invocation
//! handler against the configured storage backend.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                              |
//! |--------|-------------------|------------------------------------------|
//! | GET    | `/health`         | Health check                             |
//! | POST   | `/api/events`     | Receive a bucket notification            |
//! | POST   | `/api/transform`  | Transform an uploaded CSV (no storage)   |
//! | GET    | `/api/logs`       | SSE stream for real-time logs            |

use axum::{
    extract::{Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::LOG_BUS;
use super::types::{error_response, EventResponse, TransformResponse};
use crate::event::BucketEvent;
use crate::handler::handle_event;
use crate::storage::StorageBackend;
use crate::transform::transform_csv;

/// Shared server state.
#[derive(Clone)]
struct AppState {
    storage: StorageBackend,
}

/// Start the HTTP server against the given storage backend.
pub async fn start_server(
    port: u16,
    storage: StorageBackend,
) -> Result<(), Box<dyn std::error::Error>> {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/events", post(receive_event))
        .route("/api/transform", post(transform_upload))
        .route("/api/logs", get(sse_logs))
        .layer(cors)
        .with_state(AppState {
            storage: storage.clone(),
        });

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Quoteflow server running on http://localhost:{}", port);
    println!("   Storage: {}", storage.describe());
    println!("   POST /api/events    - Receive bucket notification");
    println!("   POST /api/transform - Transform an uploaded CSV");
    println!("   GET  /api/logs      - SSE log stream");
    println!("   GET  /health        - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "quoteflow",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "events": "POST /api/events",
            "transform": "POST /api/transform",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// Receive a bucket notification and run one invocation.
///
/// The HTTP status mirrors the `statusCode` inside the response body, so
/// plain HTTP clients see failures without parsing JSON.
async fn receive_event(
    State(state): State<AppState>,
    Json(event): Json<BucketEvent>,
) -> (StatusCode, Json<EventResponse>) {
    let response = handle_event(&event, &state.storage).await;
    let status =
        StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response))
}

/// Transform an uploaded CSV without touching storage.
async fn transform_upload(
    mut multipart: Multipart,
) -> Result<Json<TransformResponse>, (StatusCode, Json<Value>)> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response(&format!("multipart error: {}", e))),
        )
    })? {
        if field.name() == Some("file") {
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(error_response(&format!("read error: {}", e))),
                        )
                    })?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response("no file provided")),
        )
    })?;

    let text = String::from_utf8(bytes).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(error_response(&format!("input is not valid UTF-8: {}", e))),
        )
    })?;

    let transformed = transform_csv(&text).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response(&e.to_string())),
        )
    })?;

    Ok(Json(TransformResponse::from(transformed)))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BUS.subscribe();

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
