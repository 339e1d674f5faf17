// Chat orchestrator
//
// Per-request state machine:
//   RECEIVED -> SCREENED -> (CRISIS_SHORT_CIRCUIT | MODEL_QUERY) -> RESPONDED
//
// A keyword hit on the raw text short-circuits the LLM entirely and returns
// the fixed safety message. On the model path, any LLM failure degrades to a
// fixed apology; nothing from this module propagates to the transport layer
// except request validation errors.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use super::persona::Persona;
use super::session::SessionStore;
use crate::crisis::{CrisisResponder, KeywordScreener, RiskAnalyzer, RiskLevel};
use crate::errors::ChatError;
use crate::llm::{ChatMessage, LlmClient, ResponseFormat, Role};
use crate::logging::ChatLogger;

/// Fixed assistant turn used when the reply model is unavailable.
pub const APOLOGY_MESSAGE: &str =
    "I'm having trouble connecting right now. Please try again in a moment.";

const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(45);

/// Outcome of one chat turn.
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub session_id: String,
    pub response: String,
    pub is_crisis: bool,
    /// Final assessed tier; None on the short-circuit path, which skips the
    /// richer assessment.
    pub risk_level: Option<RiskLevel>,
}

/// Request handler for chat turns. All collaborators are injected at
/// construction so tests can substitute fakes.
pub struct ChatOrchestrator {
    llm: Arc<dyn LlmClient>,
    screener: KeywordScreener,
    analyzer: RiskAnalyzer,
    responder: CrisisResponder,
    sessions: SessionStore,
    logger: ChatLogger,
    reply_timeout: Duration,
}

impl ChatOrchestrator {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        screener: KeywordScreener,
        analyzer: RiskAnalyzer,
        sessions: SessionStore,
        logger: ChatLogger,
    ) -> Self {
        Self {
            llm,
            screener,
            analyzer,
            responder: CrisisResponder::new(),
            sessions,
            logger,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }

    /// Bound the wait on the reply model. A timeout counts as a transport
    /// failure and degrades to the apology text.
    pub fn with_reply_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one chat turn. Only `ChatError::Validation` can surface; every
    /// LLM failure is recovered into user-visible fallback text.
    pub async fn handle(
        &self,
        session_id: &str,
        text: &str,
        persona: Option<Persona>,
    ) -> Result<ChatReply, ChatError> {
        // RECEIVED
        let session_id = session_id.trim();
        let text = text.trim();
        if session_id.is_empty() {
            return Err(ChatError::Validation("session_id must not be empty".to_string()));
        }
        if text.is_empty() {
            return Err(ChatError::Validation("query must not be empty".to_string()));
        }

        // Holding the lock for the whole turn is the session's serialization
        // point; it is per-session, so other sessions are unaffected.
        let session = self.sessions.get_or_create(session_id);
        let mut session = session.lock().await;

        if let Some(persona) = persona {
            session.persona = persona;
        }

        // SCREENED: cheap lexical gate on the raw text, before any LLM cost
        if self.screener.scan(text) {
            // CRISIS_SHORT_CIRCUIT
            tracing::warn!(session_id, "Crisis keywords detected, returning safety message");

            let safety = self.responder.safety_message();
            session.append(Role::User, text);
            session.append(Role::Assistant, safety);
            session.touch();

            self.logger.log(session_id, text, safety, true);

            return Ok(ChatReply {
                session_id: session.id.clone(),
                response: safety.to_string(),
                is_crisis: true,
                risk_level: None,
            });
        }

        // MODEL_QUERY
        let history = session.chat_messages();
        let assessment = self.analyzer.assess(text, Some(&history)).await;

        let mut request_messages = history;
        request_messages.push(ChatMessage::user(text));
        let system_prompt = session.persona.system_prompt();

        let response = match timeout(
            self.reply_timeout,
            self.llm.complete(system_prompt, &request_messages, ResponseFormat::Text),
        )
        .await
        {
            Ok(Ok(reply)) => {
                if self.responder.should_intervene(&assessment) {
                    tracing::info!(
                        session_id,
                        risk_level = %assessment.final_risk_level,
                        "Elevated risk, appending follow-up guidance"
                    );
                    let follow_up = self.responder.follow_up_message(assessment.final_risk_level);
                    if follow_up.is_empty() {
                        reply
                    } else {
                        format!("{reply}\n\n{follow_up}")
                    }
                } else {
                    reply
                }
            }
            Ok(Err(e)) => {
                tracing::warn!(session_id, error = %e, "LLM unavailable, sending apology");
                APOLOGY_MESSAGE.to_string()
            }
            Err(_) => {
                tracing::warn!(session_id, "LLM reply timed out, sending apology");
                APOLOGY_MESSAGE.to_string()
            }
        };

        // RESPONDED: exactly one user and one assistant message per turn
        session.append(Role::User, text);
        session.append(Role::Assistant, &response);
        session.touch();

        self.logger.log(session_id, text, &response, false);

        Ok(ChatReply {
            session_id: session.id.clone(),
            response,
            is_crisis: false,
            risk_level: Some(assessment.final_risk_level),
        })
    }
}
