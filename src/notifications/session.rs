//! Session lifecycle notifications.
//!
//! Unlike the other domains, session sub-types pass through unchanged:
//! the upstream adds session states faster than the proxy revs, and the
//! IDE layer treats unknown session kinds as informational.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::string_field;

/// A `session.*` event forwarded to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionNotification {
    /// Upstream sub-type, forwarded as-is (`created`, `idle`, `error`, ...).
    pub kind: String,
    pub session_id: Option<String>,
    pub project_id: Option<String>,
    /// Full decoded payload for consumers that need more than the ids.
    pub payload: Value,
}

pub(super) fn map_session_event(sub_type: &str, payload: Value) -> Option<SessionNotification> {
    Some(SessionNotification {
        kind: sub_type.to_string(),
        session_id: string_field(&payload, "session_id", "sessionId"),
        project_id: string_field(&payload, "project_id", "projectId"),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sub_type_passes_through() {
        for kind in ["created", "idle", "deleted", "some_future_state"] {
            let n = map_session_event(kind, json!({})).unwrap();
            assert_eq!(n.kind, kind);
        }
    }

    #[test]
    fn test_ids_extracted() {
        let n = map_session_event(
            "created",
            json!({"sessionId":"s9","projectId":"p2","title":"demo"}),
        )
        .unwrap();
        assert_eq!(n.session_id.as_deref(), Some("s9"));
        assert_eq!(n.project_id.as_deref(), Some("p2"));
        assert_eq!(n.payload["title"], "demo");
    }

    #[test]
    fn test_missing_ids_are_none() {
        let n = map_session_event("idle", json!({"other":1})).unwrap();
        assert!(n.session_id.is_none());
        assert!(n.project_id.is_none());
    }
}
