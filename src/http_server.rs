//! HTTP API for the WordPress admin plugin
//!
//! `POST /api/generate` runs a tool directly, `POST /mcp` accepts a single
//! JSON-RPC request. Every route except the health check requires the API key.

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, HeaderMap, HeaderName, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use rand::RngCore;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::mcp::handler::TOOL_NAMES;
use crate::mcp::{McpServer, MetaToolHandler};

const API_KEY_HEADER: &str = "x-api-key";

const AUTH_METHOD: &str = "API key in X-API-Key or Authorization header";

const AVAILABLE_ENDPOINTS: &[&str] = &["GET /", "POST /api/generate", "POST /mcp"];

/// Shared state of every request
#[derive(Clone)]
pub struct AppState {
    handler: Arc<MetaToolHandler>,
    mcp: McpServer,
    api_key: Arc<str>,
}

impl AppState {
    pub fn new(handler: Arc<MetaToolHandler>, api_key: impl Into<String>) -> Self {
        let mcp = McpServer::new(handler.clone());
        Self {
            handler,
            mcp,
            api_key: Arc::from(api_key.into()),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// Random 256-bit key, hex encoded
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// JSON error body with a status code
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    body: Value,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({
                "error": message.into(),
                "timestamp": timestamp(),
            }),
        }
    }

    fn with(mut self, key: &str, value: Value) -> Self {
        self.body[key] = value;
        self
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::ToolNotFound(_) => ApiError::new(StatusCode::BAD_REQUEST, err.to_string())
                .with("available_tools", json!(TOOL_NAMES)),
            Error::InvalidInput(_) | Error::InvalidParams(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            _ => {
                error!("API error: {}", err);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .max_age(Duration::from_secs(86400));

    Router::new()
        .route("/", get(health))
        .route("/api/generate", post(generate))
        .route("/mcp", post(mcp_request))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C or SIGTERM
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP API listening on {}", listener.local_addr()?);
    info!("Health check: GET /, API endpoint: POST /api/generate");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Internal(e.to_string()))?;

    info!("HTTP API stopped");
    Ok(())
}

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(key) = headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        return Some(key.trim()).filter(|k| !k.is_empty());
    }
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim())
        .filter(|k| !k.is_empty())
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request.uri().path() == "/" {
        return next.run(request).await;
    }

    match presented_key(request.headers()) {
        None => {
            warn!("Authentication failed: no API key provided");
            ApiError::new(StatusCode::UNAUTHORIZED, "Authentication required")
                .with(
                    "message",
                    json!("Please provide an API key in the X-API-Key header or Authorization: Bearer header"),
                )
                .into_response()
        }
        Some(key) if key != state.api_key() => {
            warn!("Authentication failed: invalid API key");
            ApiError::new(StatusCode::UNAUTHORIZED, "Invalid API key")
                .with("message", json!("The provided API key is not valid"))
                .into_response()
        }
        Some(_) => next.run(request).await,
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "WordPress meta description generator HTTP API",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": timestamp(),
        "tools": state.handler.tools().iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
        "auth": "required",
        "authMethod": AUTH_METHOD,
    }))
}

async fn generate(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> std::result::Result<Json<Value>, ApiError> {
    let Json(body) =
        body.map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.body_text()))?;

    let tool = body
        .get("tool")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty());
    let args = body.get("args").filter(|a| !a.is_null());

    let (tool, args) = match (tool, args) {
        (Some(tool), Some(args)) => (tool, args.clone()),
        (tool, args) => {
            return Err(
                ApiError::new(StatusCode::BAD_REQUEST, "Missing tool or args parameter")
                    .with("required", json!("Both \"tool\" and \"args\" are required"))
                    .with(
                        "received",
                        json!({
                            "tool": tool,
                            "args": if args.is_some() { "present" } else { "missing" },
                        }),
                    ),
            );
        }
    };

    debug!("API request for tool {}", tool);
    let payload = state.handler.execute(tool, args)?;
    Ok(Json(payload))
}

async fn mcp_request(State(state): State<AppState>, body: String) -> Response {
    match state.mcp.process_line(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
        .with("path", json!(uri.path()))
        .with("available_endpoints", json!(AVAILABLE_ENDPOINTS))
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
