//! Shared data models for streamed message content.
//!
//! The agent streams assistant messages as an ordered list of content
//! fragments. Only `text` fragments are scanned for embedded commands;
//! every other fragment kind is carried through opaquely so new upstream
//! part types never break the proxy.

use serde::{Deserialize, Serialize};

/// A single part of a streamed assistant message.
///
/// Deserialization tries the `text` shape first and falls back to an
/// opaque JSON value for any other `type` tag, preserving it byte-for-byte
/// on the way back out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentFragment {
    /// A `{"type": "text", "text": ...}` fragment.
    Text(TextFragment),
    /// Any other fragment kind, passed through untouched.
    Opaque(serde_json::Value),
}

impl ContentFragment {
    /// Build a text fragment.
    pub fn text(text: impl Into<String>) -> Self {
        ContentFragment::Text(TextFragment::new(text))
    }

    /// The fragment's text, if it is a text fragment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentFragment::Text(fragment) => Some(&fragment.text),
            ContentFragment::Opaque(_) => None,
        }
    }
}

/// A text fragment of an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    #[serde(rename = "type")]
    kind: TextTag,
    /// The raw streamed text, possibly containing embedded command blocks.
    pub text: String,
}

impl TextFragment {
    /// Create a text fragment from raw text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: TextTag::Text,
            text: text.into(),
        }
    }
}

/// Marker tag pinning `TextFragment` to `"type": "text"` so the untagged
/// `ContentFragment` enum routes every other tag to `Opaque`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum TextTag {
    #[serde(rename = "text")]
    Text,
}
