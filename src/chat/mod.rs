//! Chat
//!
//! Conversation panel with the calendar assistant. The transcript lives only
//! in memory for the life of the view.

mod view;

pub use view::{ChatView, SubmitOutcome, ERROR_HINT, GREETING, SUGGESTIONS};
