//! In-memory conversation log

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Author, ConversationMessage};

/// Insertion-ordered list of turns for one chat session
///
/// Messages are never edited after they are appended, except for clearing
/// `awaiting_feedback`. Nothing is persisted; `reset` starts over.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
    next_id: u64,
    followed_up: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>, now: DateTime<Utc>) -> u64 {
        self.followed_up = false;
        self.push(Author::User, text.into(), now, false, false)
    }

    pub fn push_bot(
        &mut self,
        text: impl Into<String>,
        now: DateTime<Utc>,
        awaiting_feedback: bool,
        has_quick_actions: bool,
    ) -> u64 {
        self.push(Author::Bot, text.into(), now, awaiting_feedback, has_quick_actions)
    }

    fn push(
        &mut self,
        author: Author,
        text: String,
        timestamp: DateTime<Utc>,
        awaiting_feedback: bool,
        has_quick_actions: bool,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(ConversationMessage {
            id,
            author,
            text,
            timestamp,
            awaiting_feedback,
            has_quick_actions,
        });
        id
    }

    /// Clear the feedback flag on message `id`. Returns false if the message
    /// does not exist or was not waiting for feedback.
    pub fn resolve_feedback(&mut self, id: u64) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) if message.awaiting_feedback => {
                message.awaiting_feedback = false;
                true
            }
            _ => false,
        }
    }

    /// True once the bot has spoken last and the user stayed quiet for
    /// `quiet_period`. Fires at most once between user turns.
    pub fn is_idle(&self, now: DateTime<Utc>, quiet_period: Duration) -> bool {
        if self.followed_up {
            return false;
        }
        match self.messages.last() {
            Some(last) if last.author == Author::Bot => now - last.timestamp >= quiet_period,
            _ => false,
        }
    }

    pub(crate) fn mark_followed_up(&mut self) {
        self.followed_up = true;
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    /// Text of every user turn, oldest first
    pub fn user_texts(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|m| m.author == Author::User)
            .map(|m| m.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_ids_follow_insertion_order() {
        let mut conv = Conversation::new();
        let a = conv.push_user("hello", t0());
        let b = conv.push_bot("hi", t0(), false, true);
        assert_eq!((a, b), (0, 1));
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.messages()[0].author, Author::User);
        assert!(conv.messages()[1].has_quick_actions);
    }

    #[test]
    fn test_resolve_feedback_once() {
        let mut conv = Conversation::new();
        let user = conv.push_user("pricing?", t0());
        let bot = conv.push_bot("We quote per project", t0(), true, false);

        assert!(!conv.resolve_feedback(user));
        assert!(conv.resolve_feedback(bot));
        assert!(!conv.resolve_feedback(bot));
        assert!(!conv.resolve_feedback(42));

        let message = &conv.messages()[1];
        assert!(!message.awaiting_feedback);
        assert_eq!(message.text, "We quote per project");
    }

    #[test]
    fn test_is_idle() {
        let quiet = Duration::seconds(60);
        let mut conv = Conversation::new();
        assert!(!conv.is_idle(t0(), quiet));

        conv.push_user("hello", t0());
        assert!(!conv.is_idle(t0() + quiet, quiet));

        conv.push_bot("hi", t0(), false, false);
        assert!(!conv.is_idle(t0() + Duration::seconds(59), quiet));
        assert!(conv.is_idle(t0() + quiet, quiet));

        conv.mark_followed_up();
        assert!(!conv.is_idle(t0() + quiet * 2, quiet));

        conv.push_user("still here", t0() + quiet * 2);
        conv.push_bot("great", t0() + quiet * 2, false, false);
        assert!(conv.is_idle(t0() + quiet * 3, quiet));
    }

    #[test]
    fn test_reset() {
        let mut conv = Conversation::new();
        conv.push_user("hello", t0());
        conv.reset();
        assert!(conv.is_empty());
        assert_eq!(conv.push_user("again", t0()), 0);
    }

    #[test]
    fn test_user_texts() {
        let mut conv = Conversation::new();
        conv.push_bot("hi", t0(), false, true);
        conv.push_user("site is down", t0());
        conv.push_bot("sorry", t0(), true, false);
        conv.push_user("since this morning", t0());
        let texts: Vec<&str> = conv.user_texts().collect();
        assert_eq!(texts, vec!["site is down", "since this morning"]);
    }
}
