use chatlog_llm::{ChatClient, ChatOptions, ChatRequest, LlmError, OpenAIClient};
use mockito::Matcher;
use serde_json::json;

fn relay_request(prompt: &str) -> ChatRequest {
    ChatRequest::prompt("gpt-3.5-turbo", prompt)
        .with_options(ChatOptions::new().max_tokens(1000).temperature(0.7))
}

#[tokio::test]
async fn test_chat_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(Matcher::PartialJson(json!({
            "model": "gpt-3.5-turbo",
            "messages": [{"role": "user", "content": "Hello"}],
            "max_tokens": 1000,
            "temperature": 0.7
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "chatcmpl-1",
                "object": "chat.completion",
                "model": "gpt-3.5-turbo-0125",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Hi!"},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test", server.url()).unwrap();
    let response = client.chat(relay_request("Hello")).await.unwrap();

    mock.assert_async().await;
    assert_eq!(response.text(), Some("Hi!"));
}

#[tokio::test]
async fn test_chat_upstream_error_is_passed_through() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-bad", server.url()).unwrap();
    let err = client.chat(relay_request("Hello")).await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Incorrect API key provided");
}

#[tokio::test]
async fn test_chat_upstream_error_without_body_uses_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(502)
        .with_body("Bad gateway")
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test", server.url()).unwrap();
    let err = client.chat(relay_request("Hello")).await.unwrap_err();

    match err {
        LlmError::Api { status, message } => {
            assert_eq!(status, 502);
            assert_eq!(message, "OpenAI API error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_without_choices_has_no_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[]}"#)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test", server.url()).unwrap();
    let response = client.chat(relay_request("Hello")).await.unwrap();

    assert!(response.text().is_none());
}

#[tokio::test]
async fn test_chat_null_message_has_no_text() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices":[{"index":0,"message":null,"finish_reason":"content_filter"}]}"#)
        .create_async()
        .await;

    let client = OpenAIClient::with_base_url("sk-test", server.url()).unwrap();
    let response = client.chat(relay_request("Hello")).await.unwrap();

    assert!(response.content.is_none());
    assert!(response.text().is_none());
}
