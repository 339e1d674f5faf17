// Integration tests for the HTTP server

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use solace::chat::{ChatOrchestrator, SessionStore};
use solace::crisis::{KeywordScreener, RiskAnalyzer};
use solace::docs::UnavailableIndex;
use solace::errors::ChatError;
use solace::llm::{ChatMessage, LlmClient, ResponseFormat};
use solace::logging::ChatLogger;
use solace::server::{create_router, ChatServer, ServerConfig};

struct FixedLlm(&'static str);

#[async_trait]
impl LlmClient for FixedLlm {
    async fn complete(
        &self,
        _system_prompt: &str,
        _messages: &[ChatMessage],
        _format: ResponseFormat,
    ) -> Result<String, ChatError> {
        Ok(self.0.to_string())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

fn test_router() -> axum::Router {
    let screener = KeywordScreener::default();
    let orchestrator = ChatOrchestrator::new(
        Arc::new(FixedLlm("That sounds tough.")),
        screener.clone(),
        RiskAnalyzer::lexical_only(screener),
        SessionStore::new(),
        ChatLogger::disabled(),
    );

    let server = ChatServer::new(
        Arc::new(orchestrator),
        Arc::new(UnavailableIndex),
        ServerConfig::default(),
    );

    create_router(Arc::new(server))
}

fn json_post(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let router = test_router();

    let response = router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_chat_happy_path() {
    let router = test_router();

    let request = json_post(
        "/chat",
        serde_json::json!({"session_id": "s1", "query": "I had a rough day at work"}),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["response"], "That sounds tough.");
    assert_eq!(body["is_crisis"], false);
    assert_eq!(body["session_id"], "s1");
}

#[tokio::test]
async fn test_chat_crisis_path() {
    let router = test_router();

    let request = json_post(
        "/chat",
        serde_json::json!({"session_id": "s1", "query": "I want to kill myself"}),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["is_crisis"], true);
    assert!(body["response"].as_str().unwrap().contains("988"));
}

#[tokio::test]
async fn test_chat_rejects_empty_query() {
    let router = test_router();

    let request = json_post("/chat", serde_json::json!({"session_id": "s1", "query": ""}));

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error"]["type"], "invalid_request_error");
}

#[tokio::test]
async fn test_chat_accepts_persona() {
    let router = test_router();

    let request = json_post(
        "/chat",
        serde_json::json!({"session_id": "s1", "query": "hello", "persona": "peer"}),
    );

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_doc_chat_reports_unavailable_index() {
    let router = test_router();

    let request = json_post("/doc-chat", serde_json::json!({"query": "coping strategies"}));

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["response"].as_str().unwrap().contains("unavailable"));
}

#[tokio::test]
async fn test_welcome_route() {
    let router = test_router();

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("Solace"));
}
