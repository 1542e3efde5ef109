mod common;

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chatlog_types::today;
use mockito::Matcher;
use serde_json::{json, Value};

fn history() -> Value {
    json!([{
        "timestamp": "2024-03-01T12:00:00.000Z",
        "prompt": "Hello",
        "response": "Hi",
        "model": "gpt-3.5-turbo"
    }])
}

fn contents_path() -> String {
    format!("/repos/me/logs/contents/logs/{}.json", today())
}

fn encoded(history: &Value) -> String {
    STANDARD.encode(serde_json::to_string_pretty(history).unwrap())
}

#[tokio::test]
async fn test_creates_file_when_missing() {
    let mut server = mockito::Server::new_async().await;
    let date = today();

    let probe = server
        .mock("GET", contents_path().as_str())
        .match_header("authorization", "Bearer ghp_test")
        .with_status(404)
        .with_body(json!({"message": "Not Found"}).to_string())
        .create_async()
        .await;
    let put = server
        .mock("PUT", contents_path().as_str())
        .match_body(Matcher::Json(json!({
            "message": format!("Update chat logs for {}", date),
            "content": encoded(&history()),
        })))
        .with_status(201)
        .with_body(
            json!({"content": {
                "sha": "abc123",
                "path": format!("logs/{}.json", date),
                "html_url": "https://github.com/me/logs/blob/main/logs/today.json"
            }})
            .to_string(),
        )
        .create_async()
        .await;

    let app = common::app("http://127.0.0.1:9", &server.url());
    let (status, body) = common::post(
        app,
        "/api/github/upload",
        json!({"chatHistory": history(), "githubToken": "ghp_test", "githubRepo": "me/logs"}),
    )
    .await;

    probe.assert_async().await;
    put.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "url": "https://github.com/me/logs/blob/main/logs/today.json",
            "message": format!("Chat logs uploaded successfully for {}", date),
            "date": date,
        })
    );
}

#[tokio::test]
async fn test_second_upload_overwrites_with_revision() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", contents_path().as_str())
        .with_status(200)
        .with_body(json!({"sha": "existing-sha"}).to_string())
        .create_async()
        .await;
    let put = server
        .mock("PUT", contents_path().as_str())
        .match_body(Matcher::PartialJson(json!({"sha": "existing-sha"})))
        .with_status(200)
        .with_body(json!({"content": {"html_url": "https://example.test/f"}}).to_string())
        .create_async()
        .await;

    let app = common::app("http://127.0.0.1:9", &server.url());
    let (status, body) = common::post(
        app,
        "/api/github/upload",
        json!({"chatHistory": history(), "githubToken": "ghp_test", "githubRepo": "me/logs"}),
    )
    .await;

    put.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://example.test/f");
}

#[tokio::test]
async fn test_missing_parameters() {
    let mut server = mockito::Server::new_async().await;
    let any = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    for body in [
        json!({"githubToken": "ghp_test", "githubRepo": "me/logs"}),
        json!({"chatHistory": [], "githubRepo": "me/logs"}),
        json!({"chatHistory": [], "githubToken": "ghp_test"}),
        json!({"chatHistory": null, "githubToken": "ghp_test", "githubRepo": "me/logs"}),
    ] {
        let app = common::app("http://127.0.0.1:9", &server.url());
        let (status, response) = common::post(app, "/api/github/upload", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response, json!({"error": "Missing required parameters"}));
    }

    any.assert_async().await;
}

#[tokio::test]
async fn test_upstream_rejection_passed_through() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("GET", contents_path().as_str())
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("PUT", contents_path().as_str())
        .with_status(403)
        .with_body(json!({"message": "Resource not accessible by integration"}).to_string())
        .create_async()
        .await;

    let app = common::app("http://127.0.0.1:9", &server.url());
    let (status, body) = common::post(
        app,
        "/api/github/upload",
        json!({"chatHistory": history(), "githubToken": "ghp_test", "githubRepo": "me/logs"}),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"error": "Resource not accessible by integration"}));
}
