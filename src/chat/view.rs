//! Chat View
//!
//! Linear request/response loop with the calendar assistant. One request is
//! outstanding at a time; the user's entry is appended before the call and
//! exactly one reply or error entry after it.

use std::sync::Arc;

use crate::api::CalendarApi;
use crate::model::{ChatMessage, ChatRole, MessageId, MessageIds};

/// First transcript entry of every session
pub const GREETING: &str =
    "Hi. I'm your calendar assistant. You can ask me about your activities or request changes.";

/// Appended to the failure message of an error entry
pub const ERROR_HINT: &str =
    "Check that the backend is running and that the OpenAI API key is configured.";

/// Offered while the transcript holds only the greeting
pub const SUGGESTIONS: [&str; 4] = [
    "What activities do I have today?",
    "What is my next activity?",
    "What do I have this week?",
    "Show me all my activities",
];

const GREETING_ID: MessageId = 1;

/// What a call to [`ChatView::submit`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input or a request already pending; nothing happened
    Ignored,
    Answered,
    Failed,
}

pub struct ChatView {
    api: Arc<dyn CalendarApi>,
    transcript: Vec<ChatMessage>,
    input: String,
    pending: bool,
    ids: MessageIds,
}

impl ChatView {
    pub fn new(api: Arc<dyn CalendarApi>) -> Self {
        Self {
            api,
            transcript: vec![ChatMessage::new(GREETING_ID, ChatRole::Assistant, GREETING)],
            input: String::new(),
            pending: false,
            ids: MessageIds::starting_after(GREETING_ID),
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a request is in flight
    ///
    /// Only `true` inside [`ChatView::submit`]; it guards against re-entry and
    /// is never seen by callers holding the view.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether the send action is available
    pub fn can_send(&self) -> bool {
        !self.pending && !self.input.trim().is_empty()
    }

    /// Entry the transcript should be scrolled to
    pub fn scroll_anchor(&self) -> Option<MessageId> {
        self.transcript.last().map(|m| m.id)
    }

    /// Suggestion chips, only before the first exchange
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.transcript.len() == 1 {
            &SUGGESTIONS
        } else {
            &[]
        }
    }

    /// Copy suggestion `index` into the input without sending it
    pub fn apply_suggestion(&mut self, index: usize) -> bool {
        match self.suggestions().get(index) {
            Some(text) => {
                self.input = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Send the current input
    pub async fn submit(&mut self) -> SubmitOutcome {
        let text = self.input.trim().to_string();
        if text.is_empty() || self.pending {
            return SubmitOutcome::Ignored;
        }

        let user_id = self.ids.next_id();
        self.transcript
            .push(ChatMessage::new(user_id, ChatRole::User, text.clone()));
        self.input.clear();
        self.pending = true;

        let outcome = match self.api.send_chat_message(&text).await {
            Ok(reply) => {
                let id = self.ids.next_id();
                self.transcript
                    .push(ChatMessage::new(id, ChatRole::Assistant, reply.response));
                SubmitOutcome::Answered
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chat request failed");
                let id = self.ids.next_id();
                self.transcript.push(ChatMessage::new(
                    id,
                    ChatRole::Error,
                    format!("Error: {}. {}", e, ERROR_HINT),
                ));
                SubmitOutcome::Failed
            }
        };

        self.pending = false;
        outcome
    }
}
