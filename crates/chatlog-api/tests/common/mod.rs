#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use chatlog_api::{build_router, config::UpstreamConfig, AppState, Config};

/// Router whose relays point at the given stand-in upstreams.
pub fn app(openai_base_url: &str, github_base_url: &str) -> Router {
    build_router(state(openai_base_url, github_base_url))
}

pub fn state(openai_base_url: &str, github_base_url: &str) -> Arc<AppState> {
    let config = Config {
        upstream: UpstreamConfig {
            openai_base_url: openai_base_url.to_string(),
            github_base_url: github_base_url.to_string(),
        },
        ..Default::default()
    };
    Arc::new(AppState::new(config))
}

/// Router for routes that make no outbound calls.
pub fn offline_app() -> Router {
    app("http://127.0.0.1:9", "http://127.0.0.1:9")
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .oneshot(builder.body(body).expect("Failed to build request"))
        .await
        .expect("Failed to execute request");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    (status, json)
}

pub async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}
