//! Domain Types
//!
//! Plain data shared by every layer: calendar activities and chat messages.

mod activity;
mod message;

pub use activity::{
    sort_by_time, Activity, ActivityDraft, ActivityId, ClockTime, Pillar, UnknownPillar,
};
pub use message::{ChatMessage, ChatRole, MessageId, MessageIds};
