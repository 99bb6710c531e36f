//! Integration tests for the Foundry engine using wiremock
//!
//! Verify request shape and response handling against a mock
//! chat-completions endpoint.

use ai_core::{FoundryInferenceEngine, InferenceConfig, InferenceEngine, InferenceError, InferenceRequest};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sample_completion() -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {
                "role": "assistant",
                "content": "{\"destination\": \"Lisbon\", \"duration\": 5, \"travel_type\": \"vacation\"}"
            },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": 42,
            "completion_tokens": 18,
            "total_tokens": 60
        }
    })
}

fn test_engine(server: &MockServer) -> FoundryInferenceEngine {
    let config = InferenceConfig {
        timeout_ms: 5000,
        ..InferenceConfig::new(server.uri(), "gpt-4o-mini")
    };
    #[allow(clippy::expect_used)]
    FoundryInferenceEngine::new(config).expect("failed to create engine")
}

#[tokio::test]
async fn generate_returns_content_and_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({"model": "gpt-4o-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_completion()))
        .expect(1)
        .mount(&server)
        .await;

    let engine = test_engine(&server);
    let response = engine
        .generate(InferenceRequest::with_system("You are helpful", "pack for Lisbon"))
        .await
        .expect("generate should succeed");

    assert!(response.content.contains("Lisbon"));
    assert_eq!(response.model, "gpt-4o-mini");
    assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    let usage = response.usage.expect("usage present");
    assert_eq!(usage.total_tokens, 60);
}

#[tokio::test]
async fn generate_maps_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let engine = test_engine(&server);
    let err = engine
        .generate(InferenceRequest::simple("hi"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, InferenceError::RateLimited));
}

#[tokio::test]
async fn generate_maps_server_error_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("deployment warming up"))
        .mount(&server)
        .await;

    let engine = test_engine(&server);
    let err = engine
        .generate(InferenceRequest::simple("hi"))
        .await
        .expect_err("should fail");

    let InferenceError::ServerError(message) = err else {
        unreachable!("expected ServerError");
    };
    assert!(message.contains("500"));
    assert!(message.contains("warming up"));
}

#[tokio::test]
async fn generate_rejects_empty_choices() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "model": "gpt-4o-mini",
            "choices": []
        })))
        .mount(&server)
        .await;

    let engine = test_engine(&server);
    let err = engine
        .generate(InferenceRequest::simple("hi"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, InferenceError::InvalidResponse(_)));
}

#[tokio::test]
async fn generate_rejects_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let engine = test_engine(&server);
    let err = engine
        .generate(InferenceRequest::simple("hi"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, InferenceError::InvalidResponse(_)));
}

#[tokio::test]
async fn health_check_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .mount(&server)
        .await;

    let engine = test_engine(&server);
    assert!(engine.health_check().await.expect("health check"));
}

#[tokio::test]
async fn health_check_unhealthy_on_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let engine = test_engine(&server);
    assert!(!engine.health_check().await.expect("health check"));
}

#[tokio::test]
async fn request_temperature_overrides_config() {
    let server = MockServer::start().await;

    // A structured-output call should carry the lowered temperature
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({"temperature": 0.1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_completion()))
        .expect(1)
        .mount(&server)
        .await;

    let engine = test_engine(&server);
    engine
        .generate(InferenceRequest::simple("hi").with_temperature(0.1))
        .await
        .expect("generate should succeed");
}
