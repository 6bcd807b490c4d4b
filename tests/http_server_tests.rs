//! HTTP API routes driven through the router without a socket.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wp_meta_rs::http_server::{router, AppState};
use wp_meta_rs::mcp::MetaToolHandler;
use wp_meta_rs::MetaGenerator;

const API_KEY: &str = "test-key-0123456789";

fn app() -> Router {
    let handler = Arc::new(MetaToolHandler::new(Arc::new(MetaGenerator::default())));
    router(AppState::new(handler, API_KEY))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header("X-API-Key", API_KEY)
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_health_check_needs_no_key() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["auth"], "required");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_missing_and_wrong_keys_are_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authentication required");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::AUTHORIZATION, "Bearer nope")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid API key");
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", API_KEY))
        .body(Body::from(
            json!({"tool": "analyze_content", "args": {"title": "T", "content": "Some words here."}})
                .to_string(),
        ))
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_generate_returns_bare_payload() {
    let (status, body) = send(post_json(
        "/api/generate",
        json!({
            "tool": "generate_meta_description",
            "args": {
                "title": "How to Bake Bread",
                "content": "<p>Step 1: mix flour and water.</p><p>Step 2: knead for ten minutes.</p>",
                "tone": "professional"
            }
        }),
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["metaDescription"]
        .as_str()
        .unwrap()
        .contains("How to Bake Bread"));
    assert_eq!(body["analysis"]["contentType"], "tutorial");
}

#[tokio::test]
async fn test_generate_status_codes() {
    let (status, body) = send(post_json("/api/generate", json!({"tool": "analyze_content"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing tool or args parameter");
    assert!(body["required"].is_string());

    let (status, body) = send(post_json("/api/generate", json!({"tool": "rewrite_post", "args": {}}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown tool: rewrite_post");
    assert_eq!(body["available_tools"].as_array().unwrap().len(), 3);

    let (status, body) = send(post_json(
        "/api/generate",
        json!({"tool": "generate_meta_description", "args": {"title": "", "content": "x"}}),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title cannot be empty");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_batch_over_limit_is_rejected() {
    let posts: Vec<Value> = (0..21)
        .map(|i| json!({"id": i, "title": "Post", "content": "Body text for the post."}))
        .collect();
    let (status, body) = send(post_json(
        "/api/generate",
        json!({"tool": "batch_generate", "args": {"posts": posts}}),
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Too many posts"));
}

#[tokio::test]
async fn test_mcp_endpoint() {
    let (status, body) = send(post_json(
        "/mcp",
        json!({"jsonrpc": "2.0", "id": 5, "method": "tools/list"}),
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 5);
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 3);

    let (status, body) = send(post_json(
        "/mcp",
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    ))
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
}

#[tokio::test]
async fn test_unknown_path() {
    let request = Request::builder()
        .uri("/wp-admin")
        .header("X-API-Key", API_KEY)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
    assert_eq!(body["path"], "/wp-admin");
    assert!(body["available_endpoints"].is_array());
}
