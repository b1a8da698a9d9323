//! Mapping of decoded SSE frames to typed client notifications.
//!
//! Frames are routed by the dot-separated prefix of their event name into
//! one of four domains. Each domain maps upstream sub-types onto its own
//! closed set (`session.` passes sub-types through unchanged); frames with
//! an unrecognized prefix or sub-type are dropped, never forwarded with an
//! invalid type.
//!
//! # Module structure
//! - `session` - session lifecycle notifications (open sub-type set)
//! - `message` - message streaming notifications
//! - `file` - workspace file notifications
//! - `permission` - permission flow notifications

mod file;
mod message;
mod permission;
mod session;

pub use file::{FileEventKind, FileNotification};
pub use message::{MessageEventKind, MessageNotification};
pub use permission::{PermissionEventKind, PermissionNotification};
pub use session::SessionNotification;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::sse::SseFrame;

/// A typed notification ready for delivery to the client sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Session(SessionNotification),
    Message(MessageNotification),
    File(FileNotification),
    Permission(PermissionNotification),
}

/// Frame-to-notification mapping errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MapError {
    /// The frame's data payload was not valid JSON.
    #[error("invalid JSON for event '{event}': {reason}")]
    InvalidJson { event: String, reason: String },
}

/// Map a decoded frame to a notification.
///
/// Returns `Ok(None)` for frames that are valid but unroutable (unknown
/// prefix or sub-type); those are dropped by the caller. Payload decode
/// failures are an `Err` so the channel can log them per-frame without
/// tearing down the connection.
pub fn map_frame(frame: &SseFrame) -> Result<Option<Notification>, MapError> {
    let payload: Value =
        serde_json::from_str(&frame.data).map_err(|e| MapError::InvalidJson {
            event: frame.event.clone(),
            reason: e.to_string(),
        })?;

    let (prefix, sub_type) = match frame.event.split_once('.') {
        Some(split) => split,
        None => {
            debug!(event = %frame.event, "dropping event without domain prefix");
            return Ok(None);
        }
    };

    let notification = match prefix {
        "session" => {
            session::map_session_event(sub_type, payload).map(Notification::Session)
        }
        "message" => {
            message::map_message_event(sub_type, payload).map(Notification::Message)
        }
        "file" => file::map_file_event(sub_type, payload).map(Notification::File),
        "permission" => {
            permission::map_permission_event(sub_type, payload).map(Notification::Permission)
        }
        _ => {
            debug!(event = %frame.event, "dropping event with unknown prefix");
            None
        }
    };

    Ok(notification)
}

/// Pull a string field out of a payload, accepting both snake_case and
/// camelCase spellings (the upstream is not consistent across versions).
pub(crate) fn string_field(payload: &Value, snake: &str, camel: &str) -> Option<String> {
    payload
        .get(snake)
        .or_else(|| payload.get(camel))
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(event: &str, data: &str) -> SseFrame {
        SseFrame {
            event: event.to_string(),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_map_session_frame() {
        let mapped = map_frame(&frame(
            "session.created",
            r#"{"sessionId":"s1","projectId":"p1"}"#,
        ))
        .unwrap()
        .unwrap();

        match mapped {
            Notification::Session(n) => {
                assert_eq!(n.kind, "created");
                assert_eq!(n.session_id.as_deref(), Some("s1"));
                assert_eq!(n.project_id.as_deref(), Some("p1"));
            }
            other => panic!("expected session notification, got {:?}", other),
        }
    }

    #[test]
    fn test_map_invalid_json_is_error() {
        let result = map_frame(&frame("session.created", "not json"));
        assert!(matches!(result, Err(MapError::InvalidJson { .. })));
    }

    #[test]
    fn test_unknown_prefix_dropped() {
        let mapped = map_frame(&frame("telemetry.tick", "{}")).unwrap();
        assert!(mapped.is_none());
    }

    #[test]
    fn test_event_without_prefix_dropped() {
        let mapped = map_frame(&frame("ping", "{}")).unwrap();
        assert!(mapped.is_none());
    }

    #[test]
    fn test_map_error_display() {
        let err = MapError::InvalidJson {
            event: "message.created".to_string(),
            reason: "expected value".to_string(),
        };
        let shown = err.to_string();
        assert!(shown.contains("message.created"));
        assert!(shown.contains("expected value"));
    }

    #[test]
    fn test_string_field_accepts_both_spellings() {
        let snake: Value = serde_json::from_str(r#"{"session_id":"a"}"#).unwrap();
        let camel: Value = serde_json::from_str(r#"{"sessionId":"b"}"#).unwrap();

        assert_eq!(
            string_field(&snake, "session_id", "sessionId").as_deref(),
            Some("a")
        );
        assert_eq!(
            string_field(&camel, "session_id", "sessionId").as_deref(),
            Some("b")
        );
    }
}
