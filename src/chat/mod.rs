// Conversational core
// Public interface for personas, session state, and the chat orchestrator

mod orchestrator;
mod persona;
mod session;

pub use orchestrator::{ChatOrchestrator, ChatReply, APOLOGY_MESSAGE};
pub use persona::Persona;
pub use session::{Message, Session, SessionStore};
