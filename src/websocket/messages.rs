//! WebSocket Message Types
//!
//! Messages pushed by the server on `/ws/activities` whenever an activity
//! changes.

use serde::{Deserialize, Serialize};

use crate::model::{Activity, ActivityId};

/// What happened to the activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Created => "created",
            EventKind::Updated => "updated",
            EventKind::Deleted => "deleted",
        }
    }
}

/// One server-to-client change notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub event: EventKind,
    pub activity: Activity,
}

impl ActivityEvent {
    /// Parse a text frame
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn created(activity: Activity) -> Self {
        Self {
            event: EventKind::Created,
            activity,
        }
    }

    pub fn updated(activity: Activity) -> Self {
        Self {
            event: EventKind::Updated,
            activity,
        }
    }

    pub fn deleted(activity: Activity) -> Self {
        Self {
            event: EventKind::Deleted,
            activity,
        }
    }

    /// Id of the affected activity
    pub fn id(&self) -> &ActivityId {
        &self.activity.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_created() {
        let json = r#"{"event": "created", "activity": {"id": 1, "title": "Gym", "date": "2024-06-10", "time": "07:00", "pillar": "vida_sana"}}"#;
        let event = ActivityEvent::parse(json).unwrap();
        assert_eq!(event.event, EventKind::Created);
        assert_eq!(event.id(), &ActivityId::Int(1));
    }

    #[test]
    fn test_parse_rejects_unknown_event() {
        let json = r#"{"event": "archived", "activity": {"id": 1, "title": "Gym", "date": "2024-06-10"}}"#;
        assert!(ActivityEvent::parse(json).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ActivityEvent::parse("not json").is_err());
        assert!(ActivityEvent::parse(r#"{"event": "deleted"}"#).is_err());
    }
}
