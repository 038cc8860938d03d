//! OpenAI-compatible client against a mock HTTP server

use httpmock::prelude::*;
use mortgage_advisor::domain::CompletionModel;
use mortgage_advisor::infra::llm::{OpenAiClient, OpenAiClientConfig};
use serde_json::json;

fn client_for(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(OpenAiClientConfig {
        base_url: server.url("/v1"),
        api_key: "sk-test".to_string(),
        model: "gpt-test".to_string(),
        temperature: 0.3,
        max_tokens: 50,
        timeout_secs: 5,
    })
    .unwrap()
}

#[tokio::test]
async fn test_returns_trimmed_first_choice() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "id": "chatcmpl-1",
                    "choices": [
                        {"index": 0, "message": {"role": "assistant", "content": "  PROCEED\n"}},
                        {"index": 1, "message": {"role": "assistant", "content": "DECLINE"}}
                    ],
                    "usage": {"prompt_tokens": 40, "completion_tokens": 2, "total_tokens": 42}
                }));
        })
        .await;

    let client = client_for(&server);
    let answer = client.complete("Should we proceed?").await.unwrap();

    assert_eq!(answer, "PROCEED");
    assert_eq!(client.model_name(), "gpt-test");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401)
                .json_body(json!({"error": {"message": "Incorrect API key provided"}}));
        })
        .await;

    let err = client_for(&server).complete("hi").await.unwrap_err();
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_empty_choices_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"choices": []}));
        })
        .await;

    assert!(client_for(&server).complete("hi").await.is_err());
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("not json");
        })
        .await;

    assert!(client_for(&server).complete("hi").await.is_err());
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"choices": [{"message": {"content": "75000"}}]}));
        })
        .await;

    let client = OpenAiClient::new(OpenAiClientConfig {
        base_url: format!("{}/", server.url("/v1")),
        api_key: "sk-test".to_string(),
        model: "gpt-test".to_string(),
        temperature: 0.0,
        max_tokens: 10,
        timeout_secs: 5,
    })
    .unwrap();

    assert_eq!(client.complete("income?").await.unwrap(), "75000");
    mock.assert_async().await;
}

#[test]
fn test_debug_output_hides_the_key() {
    let config = OpenAiClientConfig {
        base_url: "https://api.openai.com/v1".to_string(),
        api_key: "sk-very-secret".to_string(),
        model: "gpt-3.5-turbo".to_string(),
        temperature: 0.3,
        max_tokens: 1000,
        timeout_secs: 30,
    };
    assert!(!format!("{:?}", config).contains("sk-very-secret"));
}
