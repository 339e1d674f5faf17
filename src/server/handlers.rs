// HTTP request handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ChatServer;
use crate::chat::Persona;
use crate::errors::ChatError;

/// Create the main application router
pub fn create_router(server: Arc<ChatServer>) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/chat", post(handle_chat))
        .route("/doc-chat", post(handle_doc_chat))
        .route("/health", get(health_check))
        .with_state(server)
}

/// Request body for POST /chat
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub query: String,
    /// Optional support style; sticks to the session once set
    #[serde(default)]
    pub persona: Option<Persona>,
}

/// Response body for POST /chat
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    pub is_crisis: bool,
}

async fn welcome() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to the Solace support chatbot API."
    }))
}

/// Handle POST /chat - conversational chat with memory, crisis screening,
/// and interaction logging
async fn handle_chat(
    State(server): State<Arc<ChatServer>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let reply = server
        .orchestrator()
        .handle(&request.session_id, &request.query, request.persona)
        .await?;

    Ok(Json(ChatResponse {
        response: reply.response,
        session_id: reply.session_id,
        is_crisis: reply.is_crisis,
    }))
}

/// Request body for POST /doc-chat
#[derive(Debug, Deserialize)]
pub struct DocChatRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct DocChatResponse {
    pub response: String,
}

/// Handle POST /doc-chat - queries against the document index collaborator
async fn handle_doc_chat(
    State(server): State<Arc<ChatServer>>,
    Json(request): Json<DocChatRequest>,
) -> Result<Json<DocChatResponse>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError(
            ChatError::Validation("query must not be empty".to_string()).into(),
        ));
    }

    let response = server.doc_index().query(&request.query).await?;

    Ok(Json(DocChatResponse { response }))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub active_sessions: usize,
}

/// Handle GET /health
async fn health_check(State(server): State<Arc<ChatServer>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        active_sessions: server.orchestrator().sessions().active_count(),
    })
}

/// Application error wrapper for proper HTTP error responses
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type) = match self.0.downcast_ref::<ChatError>() {
            Some(ChatError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error")
            }
            _ => {
                tracing::error!(error = %self.0, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "api_error")
            }
        };

        let body = serde_json::json!({
            "error": {
                "message": self.0.to_string(),
                "type": error_type
            }
        });

        (status, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
