//! REST API tests through the full router

mod common;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use common::ScriptedModel;
use mortgage_advisor::domain::CompletionModel;
use mortgage_advisor::{Config, MortgageAdvisorModule};
use sea_orm::{ConnectOptions, Database};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

async fn build_router(config: Config, model: Option<ScriptedModel>) -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    MortgageAdvisorModule::migrate(&db).await.unwrap();

    let model = model.map(|m| Arc::new(m) as Arc<dyn CompletionModel>);
    MortgageAdvisorModule::with_model(config, Arc::new(db), model).router()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_root_and_health() {
    let router = build_router(Config::default(), None).await;

    let (status, _, body) = send(&router, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("AI Mortgage Advisor"));
    assert_eq!(body["endpoints"]["chat"], "/chat");
    assert_eq!(body["endpoints"]["reset"], "/conversation/reset");

    let (status, _, body) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_chat_round_trip() {
    let model = ScriptedModel::new(["PROCEED"]);
    let router = build_router(Config::default(), Some(model)).await;

    let (status, headers, body) = send(&router, post_json("/chat", json!({"message": "hello"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conversation_complete"], false);
    assert!(body.get("assessment_result").is_none());
    assert_eq!(headers["x-ratelimit-limit"], "60");
    assert_eq!(headers["x-ratelimit-remaining"], "59");
    let id = body["conversation_id"].as_str().unwrap().to_string();

    // Legacy history is accepted and ignored
    let (status, _, body) = send(
        &router,
        post_json(
            "/chat",
            json!({
                "message": "yes please",
                "conversation_id": id,
                "conversation_history": [{"role": "user", "content": "hello"}]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["response"].as_str().unwrap().contains("annual income"));

    let (status, _, body) = send(&router, get(&format!("/conversations/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_step"], 3);
    assert_eq!(body["message_count"], 4);
    assert_eq!(body["last_message"]["role"], "assistant");

    let (status, _, body) = send(&router, get(&format!("/conversations/{}/messages", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 4);
    assert_eq!(body["items"][0]["content"], "hello");
}

#[tokio::test]
async fn test_full_assessment_json() {
    let answers = ["PROCEED", "60000", "2500", "Fair", "300000", "10000"];
    let router = build_router(Config::default(), Some(ScriptedModel::new(answers))).await;

    let (_, _, body) = send(&router, post_json("/chat", json!({"message": "hi"}))).await;
    let id = body["conversation_id"].as_str().unwrap().to_string();

    let mut last = Value::Null;
    for message in ["yes", "60k", "2.5k", "fair", "300k", "10k"] {
        let (status, _, body) = send(
            &router,
            post_json("/chat", json!({"message": message, "conversation_id": id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        last = body;
    }

    assert_eq!(last["conversation_complete"], true);
    let result = &last["assessment_result"];
    assert_eq!(result["assessment"]["outcome"], "Needs Manual Review");
    assert_eq!(
        result["assessment"]["notes"],
        "Manual review required. Issues: DTI ratio is above 43%, Credit score needs improvement, Down payment is insufficient."
    );
    assert_eq!(result["user_inputs"]["credit_score_category"], "Fair");
    assert_eq!(result["user_inputs"]["down_payment"], 10000.0);
    assert!((result["calculated_metrics"]["dti_ratio"].as_f64().unwrap() - 0.5).abs() < 1e-9);

    // Finished conversations are not resumable
    let (status, _, _) = send(&router, get(&format!("/conversations/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_without_api_key_is_a_server_error() {
    let router = build_router(Config::default(), None).await;

    let (status, headers, body) = send(&router, post_json("/chat", json!({"message": "hello"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers[header::CONTENT_TYPE], "application/problem+json");
    assert!(body["detail"].as_str().unwrap().contains("OPENAI_API_KEY"));

    // Reset still works
    let (status, _, body) = send(&router, post_json("/conversation/reset", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "New conversation started successfully");
    assert!(uuid::Uuid::parse_str(body["conversation_id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_chat_request_validation() {
    let router = build_router(Config::default(), Some(ScriptedModel::default())).await;

    let (status, _, _) = send(&router, post_json("/chat", json!({"conversation_id": "x"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let long = "x".repeat(2001);
    let (status, _, body) = send(&router, post_json("/chat", json!({"message": long}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);

    let (status, _, body) = send(
        &router,
        post_json("/chat", json!({"message": "hi", "conversation_id": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["title"], "conversation Not Found");
}

#[tokio::test]
async fn test_unknown_conversation_lookups() {
    let router = build_router(Config::default(), None).await;

    let (status, _, body) = send(&router, get("/conversations/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["instance"], "/conversations/nope");

    let (status, _, body) = send(&router, get("/conversations/nope/messages")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_chat_is_rate_limited_per_ip() {
    let config = Config {
        max_requests_per_minute: 2,
        ..Config::default()
    };
    let router = build_router(config, Some(ScriptedModel::default())).await;

    let from = |ip: [u8; 4]| {
        let mut request = post_json("/chat", json!({"message": "hello"}));
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((ip, 40000))));
        request
    };

    for _ in 0..2 {
        let (status, _, _) = send(&router, from([10, 0, 0, 1])).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, headers, body) = send(&router, from([10, 0, 0, 1])).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(headers.contains_key(header::RETRY_AFTER));
    assert_eq!(headers["x-ratelimit-remaining"], "0");
    assert_eq!(body["status"], 429);

    // Other clients and other endpoints are unaffected
    let (status, _, _) = send(&router, from([10, 0, 0, 2])).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_rate_limiting_can_be_disabled() {
    let config = Config {
        enable_rate_limiting: false,
        max_requests_per_minute: 1,
        ..Config::default()
    };
    let router = build_router(config, Some(ScriptedModel::default())).await;

    for _ in 0..3 {
        let (status, headers, _) = send(&router, post_json("/chat", json!({"message": "hi"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!headers.contains_key("x-ratelimit-limit"));
    }
}

#[tokio::test]
async fn test_openapi_document() {
    let router = build_router(Config::default(), None).await;

    let (status, _, body) = send(&router, get("/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/chat"]["post"].is_object());
    assert!(body["paths"]["/conversations/{id}"]["get"].is_object());
    assert!(body["components"]["schemas"]["ChatRequest"].is_object());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let router = build_router(Config::default(), None).await;

    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "http://localhost:8501")
        .body(Body::empty())
        .unwrap();
    let (_, headers, _) = send(&router, request).await;
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
