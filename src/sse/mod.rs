//! SSE (Server-Sent Events) stream tokenization.
//!
//! The upstream agent server streams newline-delimited frames:
//! - `event: <name>` - event name line
//! - `data: <json>` - data payload line (may repeat)
//! - Empty line - signals end of frame
//! - Lines starting with `:` - comments/keepalives (ignored)
//!
//! # Module structure
//! - `frames` - line classification and the `SseFrame` type
//! - `tokenizer` - stateful byte-to-frame accumulator

mod frames;
mod tokenizer;

pub use frames::{parse_sse_line, SseFrame, SseLine};
pub use tokenizer::FrameTokenizer;
