//! SSE wire-format line and frame types.

/// A classified line of an SSE stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine {
    /// Event name declaration (e.g. `event: message.created`)
    Event(String),
    /// Data payload line (e.g. `data: {"sessionId": "s1"}`)
    Data(String),
    /// Empty line - terminates the current frame
    Empty,
    /// Comment line (starts with `:`) - keepalives, ignored
    Comment(String),
}

/// A complete decoded SSE frame: a named event and its raw data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name as sent by the server, e.g. `session.idle`.
    pub event: String,
    /// Raw data payload; multiple `data:` lines are joined with `\n`.
    pub data: String,
}

/// Classify a single SSE line.
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("event:") {
        return SseLine::Event(rest.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix("data:") {
        return SseLine::Data(rest.trim().to_string());
    }

    // Unknown field (id:, retry:, ...) - ignore like a comment
    SseLine::Comment(line.to_string())
}
