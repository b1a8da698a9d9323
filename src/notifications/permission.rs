//! Permission flow notifications.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::string_field;

/// Client-facing permission event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionEventKind {
    Requested,
    Granted,
    Denied,
}

impl PermissionEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionEventKind::Requested => "requested",
            PermissionEventKind::Granted => "granted",
            PermissionEventKind::Denied => "denied",
        }
    }
}

/// A `permission.*` event forwarded to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionNotification {
    pub kind: PermissionEventKind,
    pub session_id: Option<String>,
    pub project_id: Option<String>,
    pub payload: Value,
}

pub(super) fn map_permission_event(
    sub_type: &str,
    payload: Value,
) -> Option<PermissionNotification> {
    let kind = match sub_type {
        "request" => PermissionEventKind::Requested,
        "granted" => PermissionEventKind::Granted,
        "denied" => PermissionEventKind::Denied,
        other => {
            debug!(sub_type = other, "dropping unrecognized permission event");
            return None;
        }
    };

    Some(PermissionNotification {
        kind,
        session_id: string_field(&payload, "session_id", "sessionId"),
        project_id: string_field(&payload, "project_id", "projectId"),
        payload,
    })
}
