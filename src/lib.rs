// Solace - Crisis-aware support chatbot backend
// Library exports

pub mod chat;
pub mod config;
pub mod crisis;
pub mod docs;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod server; // HTTP boundary
