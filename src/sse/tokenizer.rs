//! Stateful tokenizer turning raw response bytes into SSE frames.
//!
//! Bytes arrive in arbitrary network chunks; the tokenizer buffers them,
//! splits on newlines (tolerating `\r\n`), classifies each line, and
//! accumulates `event:`/`data:` lines until the blank line that completes
//! a frame. Comment keepalives are discarded. Frames without an event
//! name are dropped: the upstream protocol names every event, and the
//! router could not map a nameless frame anyway.

use bytes::BytesMut;
use tracing::debug;

use crate::sse::frames::{parse_sse_line, SseFrame, SseLine};

/// Accumulates bytes and emits complete SSE frames.
#[derive(Debug, Default)]
pub struct FrameTokenizer {
    /// Raw bytes not yet terminated by a newline.
    buffer: BytesMut,
    /// Event name of the frame being accumulated.
    current_event: Option<String>,
    /// Data lines of the frame being accumulated.
    data_buffer: Vec<String>,
}

impl FrameTokenizer {
    /// Create an empty tokenizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of response bytes, returning every frame it completes.
    pub fn feed_bytes(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line_bytes = self.buffer.split_to(newline + 1);
            line_bytes.truncate(line_bytes.len() - 1); // the \n itself
            if line_bytes.last() == Some(&b'\r') {
                line_bytes.truncate(line_bytes.len() - 1);
            }
            let line = String::from_utf8_lossy(&line_bytes).into_owned();
            if let Some(frame) = self.feed_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Feed a single decoded line, returning a frame if it completes one.
    pub fn feed_line(&mut self, line: &str) -> Option<SseFrame> {
        match parse_sse_line(line) {
            SseLine::Event(event) => {
                self.current_event = Some(event);
                None
            }
            SseLine::Data(data) => {
                self.data_buffer.push(data);
                None
            }
            SseLine::Empty => self.try_emit(),
            SseLine::Comment(_) => None,
        }
    }

    /// Flush any partially buffered input at end of stream.
    ///
    /// The server may close the connection without a trailing blank line;
    /// the final frame would otherwise be lost.
    pub fn flush(&mut self) -> Option<SseFrame> {
        if !self.buffer.is_empty() {
            let mut line_bytes = self.buffer.split();
            if line_bytes.last() == Some(&b'\r') {
                line_bytes.truncate(line_bytes.len() - 1);
            }
            let line = String::from_utf8_lossy(&line_bytes).into_owned();
            if let Some(frame) = self.feed_line(&line) {
                return Some(frame);
            }
        }
        self.try_emit()
    }

    /// Reset all accumulated state.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.current_event = None;
        self.data_buffer.clear();
    }

    /// Emit the accumulated frame, if any.
    fn try_emit(&mut self) -> Option<SseFrame> {
        if self.current_event.is_none() && self.data_buffer.is_empty() {
            return None;
        }

        let event = self.current_event.take();
        let data = self.data_buffer.join("\n");
        self.data_buffer.clear();

        match event {
            Some(event) => Some(SseFrame { event, data }),
            None => {
                debug!("dropping SSE frame without event name");
                None
            }
        }
    }
}
