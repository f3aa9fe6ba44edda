//! Request/Response DTOs
//!
//! Wire shapes for the endpoints that do not return an `Activity`.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Reply from `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Acknowledgement from `DELETE /api/activities/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_ack_tolerates_any_object() {
        let ack: DeleteAck =
            serde_json::from_str(r#"{"message": "Activity deleted successfully"}"#).unwrap();
        assert_eq!(ack.message.as_deref(), Some("Activity deleted successfully"));

        let ack: DeleteAck = serde_json::from_str("{}").unwrap();
        assert_eq!(ack, DeleteAck::default());
    }
}
