//! Character-level scanner for embedded `%%OS{...}%%` command blocks.
//!
//! The scanner finds the next candidate block in a piece of text by
//! tracking JSON structure one character at a time: brace/bracket depth,
//! whether the cursor is inside a string literal, and a one-shot escape
//! flag. Braces and quotes inside JSON strings never perturb the depth
//! count, so nested objects of arbitrary depth and string values
//! containing `{`, `}` or `"` are handled correctly.

/// Literal that opens a command block: the marker plus the object brace,
/// with no whitespace permitted between them.
pub const BLOCK_OPEN: &str = "%%OS{";

/// Literal that must immediately follow the closing brace.
pub const BLOCK_CLOSE: &str = "%%";

/// Scanner state, advanced one character at a time.
///
/// `ScanningText` is the resting state between blocks; `InBlock` tracks
/// JSON structure from the opening brace onward. Keeping this an explicit
/// value (rather than locals in a loop) leaves the door open to carrying
/// scan state across chunk boundaries in a streaming variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Outside any block, looking for the next marker.
    ScanningText,
    /// Inside a candidate block's JSON value.
    InBlock {
        /// Unmatched `{`/`[` minus `}`/`]`, counted outside strings.
        depth: u32,
        /// Cursor is inside a `"..."` string literal.
        in_string: bool,
        /// Previous character was an unconsumed `\` inside a string.
        escaping: bool,
    },
}

impl ScanState {
    /// State just before the block's opening `{` is consumed.
    pub fn enter_block() -> Self {
        ScanState::InBlock {
            depth: 0,
            in_string: false,
            escaping: false,
        }
    }

    /// Advance over one character.
    pub fn step(self, c: char) -> Self {
        match self {
            ScanState::ScanningText => ScanState::ScanningText,
            ScanState::InBlock {
                depth,
                in_string,
                escaping,
            } => {
                if escaping {
                    // The escaped character is consumed without interpretation.
                    return ScanState::InBlock {
                        depth,
                        in_string,
                        escaping: false,
                    };
                }
                if in_string {
                    match c {
                        '\\' => ScanState::InBlock {
                            depth,
                            in_string,
                            escaping: true,
                        },
                        '"' => ScanState::InBlock {
                            depth,
                            in_string: false,
                            escaping: false,
                        },
                        _ => self,
                    }
                } else {
                    match c {
                        '"' => ScanState::InBlock {
                            depth,
                            in_string: true,
                            escaping: false,
                        },
                        '{' | '[' => ScanState::InBlock {
                            depth: depth + 1,
                            in_string,
                            escaping,
                        },
                        '}' | ']' => ScanState::InBlock {
                            depth: depth.saturating_sub(1),
                            in_string,
                            escaping,
                        },
                        _ => self,
                    }
                }
            }
        }
    }

    /// Current depth, if inside a block.
    pub fn depth(&self) -> Option<u32> {
        match self {
            ScanState::ScanningText => None,
            ScanState::InBlock { depth, .. } => Some(*depth),
        }
    }
}

/// Result of scanning for the next block from a given position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockScan {
    /// No marker in the remaining text.
    NotFound,
    /// A marker whose block never closes (depth never returns to zero, or
    /// the closing brace is not immediately followed by `%%`). Everything
    /// from `marker_start` to the end of the text belongs to it.
    Incomplete {
        /// Byte offset of the `%` that starts the marker.
        marker_start: usize,
    },
    /// A fully delimited `%%OS{...}%%` block.
    Closed {
        /// Byte offset of the `%` that starts the marker.
        marker_start: usize,
        /// Byte offset of the opening `{`.
        json_start: usize,
        /// Byte offset one past the closing `}`.
        json_end: usize,
        /// Byte offset one past the trailing `%%`.
        end: usize,
    },
}

/// Find the next candidate command block at or after `from`.
///
/// The captured JSON span (`json_start..json_end`) is exactly the text
/// from the opening brace to the matching closing brace inclusive; whether
/// it actually parses as a command is the caller's concern.
pub fn find_block(text: &str, from: usize) -> BlockScan {
    let rel = match text[from..].find(BLOCK_OPEN) {
        Some(rel) => rel,
        None => return BlockScan::NotFound,
    };
    let marker_start = from + rel;
    let json_start = marker_start + BLOCK_OPEN.len() - 1;

    let mut state = ScanState::enter_block();
    let mut json_end = None;
    for (i, c) in text[json_start..].char_indices() {
        state = state.step(c);
        if state.depth() == Some(0) {
            json_end = Some(json_start + i + c.len_utf8());
            break;
        }
    }

    let json_end = match json_end {
        Some(end) => end,
        None => return BlockScan::Incomplete { marker_start },
    };

    if text[json_end..].starts_with(BLOCK_CLOSE) {
        BlockScan::Closed {
            marker_start,
            json_start,
            json_end,
            end: json_end + BLOCK_CLOSE.len(),
        }
    } else {
        BlockScan::Incomplete { marker_start }
    }
}
