//! Message streaming notifications.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::string_field;

/// Client-facing message event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageEventKind {
    Created,
    /// A streamed part or delta was appended.
    Partial,
    Completed,
}

impl MessageEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageEventKind::Created => "created",
            MessageEventKind::Partial => "partial",
            MessageEventKind::Completed => "completed",
        }
    }
}

/// A `message.*` event forwarded to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageNotification {
    pub kind: MessageEventKind,
    pub session_id: Option<String>,
    pub project_id: Option<String>,
    pub payload: Value,
}

pub(super) fn map_message_event(sub_type: &str, payload: Value) -> Option<MessageNotification> {
    let kind = match sub_type {
        "created" => MessageEventKind::Created,
        "streaming" | "part_added" => MessageEventKind::Partial,
        "completed" => MessageEventKind::Completed,
        other => {
            debug!(sub_type = other, "dropping unrecognized message event");
            return None;
        }
    };

    Some(MessageNotification {
        kind,
        session_id: string_field(&payload, "session_id", "sessionId"),
        project_id: string_field(&payload, "project_id", "projectId"),
        payload,
    })
}
