//! Chat transcript entries

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    /// Synthesized locally when a chat call fails
    Error,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::Error => "error",
        }
    }
}

/// Display-order identifier, derived from the wall clock in milliseconds
pub type MessageId = i64;

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(id: MessageId, role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id,
            role,
            content: content.into(),
        }
    }
}

/// Hands out timestamp-based ids that never repeat or go backwards
#[derive(Debug, Clone, Default)]
pub struct MessageIds {
    last: MessageId,
}

impl MessageIds {
    /// Start after an already-used id (e.g. the greeting)
    pub fn starting_after(last: MessageId) -> Self {
        Self { last }
    }

    pub fn next_id(&mut self) -> MessageId {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_strictly_increase() {
        let mut ids = MessageIds::starting_after(1);
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a > 1);
        assert!(b > a);
        assert!(c > b);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::new(5, ChatRole::Error, "boom");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"error\""));
    }
}
