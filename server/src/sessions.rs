use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub message: String,
    pub is_bot: bool,
    pub timestamp: String,
    /// Only set on bot replies.
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub session_id: String,
    pub user_ip: Option<String>,
    pub created_at: String,
    pub last_activity: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip)]
    last_seen: Instant,
}

/// In-memory conversation log keyed by session id. Idle sessions are removed by [`SessionStore::prune_idle`].
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, ChatSession>>,
}

impl SessionStore {
    pub fn new() -> Self { Self::default() }

    /// Resume `session_id` if it exists, otherwise open a fresh session. Returns the id in use.
    pub fn resume_or_create(&self, session_id: Option<&str>, user_ip: Option<String>) -> String {
        let mut sessions = self.sessions.write();
        if let Some(id) = session_id {
            if let Some(session) = sessions.get_mut(id) {
                session.last_seen = Instant::now();
                return id.to_string();
            }
        }
        let id = uuid::Uuid::new_v4().to_string();
        let now = now_rfc3339();
        tracing::debug!(session_id = %id, ?user_ip, "new chat session");
        sessions.insert(
            id.clone(),
            ChatSession {
                session_id: id.clone(),
                user_ip,
                created_at: now.clone(),
                last_activity: now,
                messages: Vec::new(),
                last_seen: Instant::now(),
            },
        );
        id
    }

    /// Append to a session's log. Unknown ids are ignored.
    pub fn record(&self, session_id: &str, message: String, is_bot: bool, confidence: Option<f64>) {
        let mut sessions = self.sessions.write();
        if let Some(session) = sessions.get_mut(session_id) {
            let timestamp = now_rfc3339();
            session.last_activity = timestamp.clone();
            session.last_seen = Instant::now();
            session.messages.push(ChatMessage { message, is_bot, timestamp, confidence });
        }
    }

    /// Remove sessions with no activity for at least `max_idle`. Returns how many were removed.
    pub fn prune_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| s.last_seen.elapsed() < max_idle);
        before - sessions.len()
    }

    pub fn get(&self, session_id: &str) -> Option<ChatSession> { self.sessions.read().get(session_id).cloned() }

    pub fn len(&self) -> usize { self.sessions.read().len() }

    pub fn is_empty(&self) -> bool { self.sessions.read().is_empty() }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| "".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_session_id_starts_a_new_session() {
        let store = SessionStore::new();
        let id = store.resume_or_create(Some("missing"), None);
        assert_ne!(id, "missing");
        assert_eq!(store.resume_or_create(Some(&id), None), id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn records_messages_in_order() {
        let store = SessionStore::new();
        let id = store.resume_or_create(None, Some("10.0.0.1".into()));
        store.record(&id, "hi".into(), false, None);
        store.record(&id, "Hello!".into(), true, Some(1.0));
        let session = store.get(&id).unwrap();
        assert_eq!(session.user_ip.as_deref(), Some("10.0.0.1"));
        let texts: Vec<&str> = session.messages.iter().map(|m| m.message.as_str()).collect();
        assert_eq!(texts, vec!["hi", "Hello!"]);
        assert!(session.messages[1].is_bot);
        assert_eq!(session.messages[1].confidence, Some(1.0));
    }

    #[test]
    fn prune_idle_drops_only_stale_sessions() {
        let store = SessionStore::new();
        let id = store.resume_or_create(None, None);
        assert_eq!(store.prune_idle(Duration::from_secs(3600)), 0);
        assert!(store.get(&id).is_some());
        assert_eq!(store.prune_idle(Duration::ZERO), 1);
        assert!(store.is_empty());
        // an expired id starts over
        assert_ne!(store.resume_or_create(Some(&id), None), id);
    }
}
