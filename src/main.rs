// Solace - crisis-aware support chatbot backend
// Main entry point

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::prelude::*;

use solace::chat::{ChatOrchestrator, Persona, SessionStore};
use solace::config::{load_config, Config};
use solace::crisis::{KeywordScreener, RiskAnalyzer};
use solace::docs::UnavailableIndex;
use solace::llm::MistralClient;
use solace::logging::ChatLogger;
use solace::server::{ChatServer, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "solace")]
#[command(about = "Crisis-aware AI support chatbot backend", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Run the HTTP chat server
    Serve {
        /// Bind address (default: 127.0.0.1:8000)
        #[arg(long, default_value = "127.0.0.1:8000")]
        bind: String,
    },
    /// Execute a single chat turn and print the reply
    Query {
        /// Query text
        query: String,

        /// Support style: peer, mentor, or therapist
        #[arg(long)]
        persona: Option<Persona>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    match args.command {
        Command::Serve { bind } => run_serve(bind).await,
        Command::Query { query, persona } => run_query(query, persona).await,
    }
}

fn init_tracing() {
    // Default: INFO level, can be overridden with RUST_LOG env var
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Bridge log crate -> tracing (for dependencies using log crate)
    tracing_log::LogTracer::init().ok();
}

fn build_orchestrator(config: &Config, logger: ChatLogger) -> Result<ChatOrchestrator> {
    let screener = match &config.keywords_path {
        Some(path) => KeywordScreener::load_from_file(path)?,
        None => KeywordScreener::default(),
    };

    let chat_client =
        Arc::new(MistralClient::new(config.api_key.clone())?.with_model(&config.chat_model));
    let analysis_client =
        Arc::new(MistralClient::new(config.api_key.clone())?.with_model(&config.analysis_model));

    let analyzer = RiskAnalyzer::new(screener.clone(), analysis_client);
    let sessions = SessionStore::with_expiry(config.session_timeout_minutes);

    Ok(ChatOrchestrator::new(
        chat_client,
        screener,
        analyzer,
        sessions,
        logger,
    ))
}

async fn run_serve(bind: String) -> Result<()> {
    let config = load_config()?;

    let logger = ChatLogger::new(config.log_path.clone());
    let orchestrator = build_orchestrator(&config, logger)?;

    let server = ChatServer::new(
        Arc::new(orchestrator),
        Arc::new(UnavailableIndex),
        ServerConfig { bind_address: bind },
    );

    server.serve().await
}

async fn run_query(query: String, persona: Option<Persona>) -> Result<()> {
    let config = load_config()?;

    let orchestrator = build_orchestrator(&config, ChatLogger::disabled())?;

    let session_id = uuid::Uuid::new_v4().to_string();
    let reply = orchestrator.handle(&session_id, &query, persona).await?;

    println!("{}", reply.response);
    Ok(())
}
