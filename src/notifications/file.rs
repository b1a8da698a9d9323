//! Workspace file notifications.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::string_field;

/// Client-facing file event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileEventKind {
    /// File content differs from disk (created, modified, or edited).
    Changed,
    Saved,
    Reset,
}

impl FileEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileEventKind::Changed => "changed",
            FileEventKind::Saved => "saved",
            FileEventKind::Reset => "reset",
        }
    }
}

/// A `file.*` event forwarded to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileNotification {
    pub kind: FileEventKind,
    pub session_id: Option<String>,
    pub project_id: Option<String>,
    pub payload: Value,
}

pub(super) fn map_file_event(sub_type: &str, payload: Value) -> Option<FileNotification> {
    let kind = match sub_type {
        "changed" | "created" | "modified" => FileEventKind::Changed,
        "saved" => FileEventKind::Saved,
        "reset" => FileEventKind::Reset,
        other => {
            debug!(sub_type = other, "dropping unrecognized file event");
            return None;
        }
    };

    Some(FileNotification {
        kind,
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
    fn test_changed_variants_collapse() {
        for sub in ["changed", "created", "modified"] {
            let n = map_file_event(sub, json!({})).unwrap();
            assert_eq!(n.kind, FileEventKind::Changed, "sub-type {}", sub);
        }
    }

    #[test]
    fn test_saved_and_reset() {
        assert_eq!(
            map_file_event("saved", json!({})).unwrap().kind,
            FileEventKind::Saved
        );
        assert_eq!(
            map_file_event("reset", json!({})).unwrap().kind,
            FileEventKind::Reset
        );
    }

    #[test]
    fn test_unknown_sub_type_dropped() {
        assert!(map_file_event("renamed", json!({})).is_none());
    }

    #[test]
    fn test_path_stays_in_payload() {
        let n = map_file_event("saved", json!({"path":"src/main.rs","sessionId":"s1"})).unwrap();
        assert_eq!(n.payload["path"], "src/main.rs");
        assert_eq!(n.session_id.as_deref(), Some("s1"));
    }
}
