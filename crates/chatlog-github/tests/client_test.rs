use base64::{engine::general_purpose::STANDARD, Engine as _};
use chatlog_github::{GitHubClient, GitHubError};
use mockito::Matcher;
use serde_json::json;

const PATH: &str = "/repos/me/logs/contents/logs/2024-03-01.json";

fn encoded(value: &serde_json::Value) -> String {
    STANDARD.encode(serde_json::to_string_pretty(value).unwrap())
}

#[tokio::test]
async fn test_upload_creates_missing_file() {
    let mut server = mockito::Server::new_async().await;
    let log = json!([{"prompt": "a", "response": "b"}]);

    let probe = server
        .mock("GET", PATH)
        .match_header("authorization", "Bearer ghp_test")
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;
    let put = server
        .mock("PUT", PATH)
        .match_body(Matcher::Json(json!({
            "message": "Update chat logs for 2024-03-01",
            "content": encoded(&log),
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content":{"sha":"new","html_url":"https://github.com/me/logs/blob/main/logs/2024-03-01.json"}}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url("ghp_test", server.url()).unwrap();
    let response = client
        .upload_json("me/logs", "logs/2024-03-01.json", "Update chat logs for 2024-03-01", &log)
        .await
        .unwrap();

    probe.assert_async().await;
    put.assert_async().await;
    assert_eq!(
        response.html_url(),
        Some("https://github.com/me/logs/blob/main/logs/2024-03-01.json")
    );
}

#[tokio::test]
async fn test_upload_overwrites_with_revision_handle() {
    let mut server = mockito::Server::new_async().await;
    let log = json!([]);

    server
        .mock("GET", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"sha":"abc123","path":"logs/2024-03-01.json"}"#)
        .create_async()
        .await;
    let put = server
        .mock("PUT", PATH)
        .match_body(Matcher::PartialJson(json!({"sha": "abc123"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content":{"html_url":"https://example.test/f"}}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url("ghp_test", server.url()).unwrap();
    let response = client
        .upload_json("me/logs", "logs/2024-03-01.json", "msg", &log)
        .await
        .unwrap();

    put.assert_async().await;
    assert_eq!(response.html_url(), Some("https://example.test/f"));
}

#[tokio::test]
async fn test_upload_failure_surfaces_upstream_message() {
    let mut server = mockito::Server::new_async().await;

    server.mock("GET", PATH).with_status(404).create_async().await;
    server
        .mock("PUT", PATH)
        .with_status(403)
        .with_body(r#"{"message":"Resource not accessible by personal access token"}"#)
        .create_async()
        .await;

    let client = GitHubClient::with_base_url("ghp_test", server.url()).unwrap();
    let err = client
        .upload_json("me/logs", "logs/2024-03-01.json", "msg", &json!([]))
        .await
        .unwrap_err();

    match err {
        GitHubError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "Resource not accessible by personal access token");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
