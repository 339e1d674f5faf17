// Per-session conversation state and the session store
//
// Sessions are keyed by an opaque id and created lazily on first use. Each
// session sits behind its own async mutex, so concurrent turns on the same
// id serialize while different sessions proceed independently.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time;

use super::persona::Persona;
use crate::llm::{ChatMessage, Role};

/// One message in a session's history. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Ordered, append-only conversation log plus the session's persona.
#[derive(Debug)]
pub struct Session {
    pub id: String,
    pub persona: Persona,
    messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            persona: Persona::default(),
            messages: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    /// Append one message. There is deliberately no way to remove or reorder
    /// history.
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(Message {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        });
    }

    /// Full history in chronological order.
    pub fn history(&self) -> &[Message] {
        &self.messages
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// History projected into the wire shape for an LLM request.
    pub fn chat_messages(&self) -> Vec<ChatMessage> {
        self.messages
            .iter()
            .map(|m| ChatMessage {
                role: m.role,
                content: m.content.clone(),
            })
            .collect()
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    fn is_expired(&self, timeout_minutes: u64) -> bool {
        let elapsed = Utc::now().signed_duration_since(self.last_activity);
        elapsed.num_minutes() >= timeout_minutes as i64
    }
}

/// Concurrent session store backed by a DashMap of per-session mutexes.
///
/// The core contract is only get_or_create / append / history; eviction is a
/// store-level policy and nothing in the pipeline assumes one.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a background task that evicts sessions idle longer than
    /// `timeout_minutes`. Must be called from within a tokio runtime.
    pub fn with_expiry(timeout_minutes: u64) -> Self {
        let store = Self::new();
        store.start_cleanup_task(timeout_minutes);
        store
    }

    /// Look up a session, creating it lazily on first use. The returned
    /// handle is the session's serialization point: lock it for the whole
    /// turn.
    pub fn get_or_create(&self, session_id: &str) -> Arc<Mutex<Session>> {
        if let Some(existing) = self.sessions.get(session_id) {
            return Arc::clone(existing.value());
        }

        let entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::info!(session_id, "Created new session");
                Arc::new(Mutex::new(Session::new(session_id.to_string())))
            });
        Arc::clone(entry.value())
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn remove(&self, session_id: &str) -> bool {
        self.sessions.remove(session_id).is_some()
    }

    fn start_cleanup_task(&self, timeout_minutes: u64) {
        let sessions = Arc::clone(&self.sessions);

        tokio::spawn(async move {
            let mut interval = time::interval(Duration::from_secs(60));

            loop {
                interval.tick().await;

                let expired: Vec<String> = sessions
                    .iter()
                    .filter_map(|entry| {
                        // A locked session is mid-turn and therefore active
                        match entry.value().try_lock() {
                            Ok(session) if session.is_expired(timeout_minutes) => {
                                Some(entry.key().clone())
                            }
                            _ => None,
                        }
                    })
                    .collect();

                let mut removed = 0;
                for session_id in expired {
                    if sessions.remove(&session_id).is_some() {
                        removed += 1;
                        tracing::debug!(session_id = %session_id, "Removed expired session");
                    }
                }

                if removed > 0 {
                    tracing::info!(
                        removed,
                        active = sessions.len(),
                        "Cleaned up expired sessions"
                    );
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lazy_creation_and_lookup() {
        let store = SessionStore::new();
        assert_eq!(store.active_count(), 0);

        let first = store.get_or_create("abc");
        assert_eq!(store.active_count(), 1);

        let second = store.get_or_create("abc");
        assert_eq!(store.active_count(), 1);
        assert!(Arc::ptr_eq(&first, &second));

        store.get_or_create("def");
        assert_eq!(store.active_count(), 2);
    }

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = SessionStore::new();
        let session = store.get_or_create("abc");
        let mut session = session.lock().await;

        session.append(Role::User, "first");
        session.append(Role::Assistant, "second");
        session.append(Role::User, "third");

        let history = session.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "first");
        assert_eq!(history[1].content, "second");
        assert_eq!(history[2].content, "third");
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
        assert!(history[0].timestamp <= history[2].timestamp);
    }

    #[tokio::test]
    async fn test_same_session_turns_serialize() {
        let store = SessionStore::new();
        let mut handles = Vec::new();

        // 8 concurrent turns on one id, two appends each; the per-session
        // lock must keep each pair adjacent
        for i in 0..8 {
            let session = store.get_or_create("shared");
            handles.push(tokio::spawn(async move {
                let mut session = session.lock().await;
                session.append(Role::User, format!("q{i}"));
                tokio::task::yield_now().await;
                session.append(Role::Assistant, format!("a{i}"));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let session = store.get_or_create("shared");
        let session = session.lock().await;
        let history = session.history();
        assert_eq!(history.len(), 16);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
            assert_eq!(pair[0].content[1..], pair[1].content[1..]);
        }
    }

    #[tokio::test]
    async fn test_chat_messages_projection() {
        let store = SessionStore::new();
        let session = store.get_or_create("abc");
        let mut session = session.lock().await;

        session.append(Role::User, "hi");
        session.append(Role::Assistant, "hello");

        let messages = session.chat_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::user("hi"));
        assert_eq!(messages[1], ChatMessage::assistant("hello"));
    }

    #[tokio::test]
    async fn test_remove() {
        let store = SessionStore::new();
        store.get_or_create("abc");

        assert!(store.remove("abc"));
        assert!(!store.remove("abc"));
        assert_eq!(store.active_count(), 0);
    }
}
