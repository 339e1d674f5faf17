// Solace - HTTP boundary
// Thin axum layer around the chat orchestrator

mod handlers;

pub use handlers::{create_router, ChatRequest, ChatResponse};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::chat::ChatOrchestrator;
use crate::docs::DocumentIndex;

/// Configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8000")
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Main chatbot server structure
pub struct ChatServer {
    orchestrator: Arc<ChatOrchestrator>,
    doc_index: Arc<dyn DocumentIndex>,
    config: ServerConfig,
}

impl ChatServer {
    pub fn new(
        orchestrator: Arc<ChatOrchestrator>,
        doc_index: Arc<dyn DocumentIndex>,
        config: ServerConfig,
    ) -> Self {
        Self {
            orchestrator,
            doc_index,
            config,
        }
    }

    /// Start the HTTP server
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self.config.bind_address.parse()?;

        let app_state = Arc::new(self);

        // Open CORS so a browser frontend can reach the API directly
        let app = create_router(app_state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        tracing::info!("Starting Solace chat server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn orchestrator(&self) -> &Arc<ChatOrchestrator> {
        &self.orchestrator
    }

    pub fn doc_index(&self) -> &Arc<dyn DocumentIndex> {
        &self.doc_index
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
