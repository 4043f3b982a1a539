use chrono::{DateTime, Utc};
use docqa_core::types::{Speaker, Turn};
use uuid::Uuid;

/// The conversation of one interactive session.
///
/// Turns are only ever added in completed User/Model pairs through
/// [`commit_exchange`](Self::commit_exchange), so the history never ends on an
/// unanswered question. Callers that need the history plus a question still in
/// flight build a throwaway view with [`with_pending`](Self::with_pending).
#[derive(Debug, Clone)]
pub struct ConversationSession {
    /// Unique session identifier
    pub id: String,
    /// When the session was created
    pub created_at: DateTime<Utc>,
    /// Last time an exchange was recorded or the history was cleared
    pub updated_at: DateTime<Utc>,
    turns: Vec<Turn>,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSession {
    /// Create an empty session with a fresh id
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            turns: Vec::new(),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of completed question/answer exchanges
    pub fn exchange_count(&self) -> usize {
        self.turns.len() / 2
    }

    /// The recorded turns followed by `pending`, as an owned copy.
    /// The session itself is not touched.
    pub fn with_pending(&self, pending: Turn) -> Vec<Turn> {
        let mut view = Vec::with_capacity(self.turns.len() + 1);
        view.extend_from_slice(&self.turns);
        view.push(pending);
        view
    }

    /// Record a finished exchange: the user's original question and the model's answer
    pub(crate) fn commit_exchange(&mut self, question: &str, answer: &str) {
        self.turns.push(Turn::user(question));
        self.turns.push(Turn::model(answer));
        self.updated_at = Utc::now();
        debug_assert!(self.is_well_formed());
    }

    /// Forget the conversation so far, keeping the session id
    pub fn clear(&mut self) {
        self.turns.clear();
        self.updated_at = Utc::now();
    }

    /// True when every User turn is directly answered by a Model turn
    pub fn is_well_formed(&self) -> bool {
        self.turns.len() % 2 == 0
            && self
                .turns
                .chunks(2)
                .all(|pair| pair[0].role == Speaker::User && pair[1].role == Speaker::Model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_session_creation() {
        let session = ConversationSession::new();
        assert!(session.is_empty());
        assert_eq!(session.exchange_count(), 0);
        assert!(Uuid::parse_str(&session.id).is_ok());
        assert_ne!(session.id, ConversationSession::new().id);
    }

    #[test]
    fn test_pending_view_leaves_session_untouched() {
        let mut session = ConversationSession::new();
        session.commit_exchange("What is a stack?", "A LIFO structure.");

        let view = session.with_pending(Turn::user("And a queue?"));

        assert_eq!(view.len(), 3);
        assert_eq!(view[2], Turn::user("And a queue?"));
        assert_eq!(session.len(), 2);
        assert!(session.is_well_formed());
    }

    #[test]
    fn test_commit_adds_user_then_model() {
        let mut session = ConversationSession::new();
        let before = session.updated_at;
        thread::sleep(Duration::from_millis(5));

        session.commit_exchange("What is a stack?", "A LIFO structure.");

        assert_eq!(
            session.turns(),
            &[Turn::user("What is a stack?"), Turn::model("A LIFO structure.")]
        );
        assert_eq!(session.exchange_count(), 1);
        assert!(session.updated_at > before);
        assert!(session.is_well_formed());
    }

    #[test]
    fn test_clear_keeps_id() {
        let mut session = ConversationSession::new();
        let id = session.id.clone();
        session.commit_exchange("q", "a");

        session.clear();

        assert!(session.is_empty());
        assert_eq!(session.id, id);
    }
}
