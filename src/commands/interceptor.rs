//! Batch command interception over message content fragments.
//!
//! Each call is self-contained: it scans one batch of fragments, extracts
//! every well-formed command block, and returns the cleaned fragments with
//! the blocks removed. Malformed or `cmd`-less blocks stay in the text
//! verbatim (visible failure rather than silent data loss); a block still
//! open when its fragment ends is dropped along with the fragment
//! remainder.

use crate::commands::block::{parse_command, CommandBlock};
use crate::commands::scanner::{find_block, BlockScan};
use crate::models::ContentFragment;

/// Result of intercepting one fragment batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InterceptOutcome {
    /// Fragments with extracted command text removed. Fragments whose text
    /// became empty are dropped; non-text fragments keep their relative
    /// order.
    pub clean: Vec<ContentFragment>,
    /// Extracted commands in left-to-right, fragment order.
    pub commands: Vec<CommandBlock>,
}

/// Scan a batch of fragments for embedded `%%OS{...}%%` command blocks.
///
/// Non-text fragments pass through untouched. This never fails: anything
/// that cannot be extracted as a command remains in the clean text.
pub fn intercept(fragments: &[ContentFragment]) -> InterceptOutcome {
    let mut outcome = InterceptOutcome::default();

    for fragment in fragments {
        match fragment {
            ContentFragment::Text(text_fragment) => {
                let (cleaned, mut extracted) = scrub_text(&text_fragment.text);
                outcome.commands.append(&mut extracted);
                if !cleaned.is_empty() {
                    outcome.clean.push(ContentFragment::text(cleaned));
                }
            }
            other => outcome.clean.push(other.clone()),
        }
    }

    outcome
}

/// Extract every command block from one piece of text.
///
/// Returns the cleaned text and the extracted commands. Surrounding text
/// is preserved exactly; separators adjacent to a removed block are not
/// collapsed.
fn scrub_text(text: &str) -> (String, Vec<CommandBlock>) {
    let mut cleaned = String::new();
    let mut commands = Vec::new();
    let mut cursor = 0;

    loop {
        match find_block(text, cursor) {
            BlockScan::NotFound => {
                cleaned.push_str(&text[cursor..]);
                break;
            }
            BlockScan::Incomplete { marker_start } => {
                // An unterminated block consumes the fragment remainder
                cleaned.push_str(&text[cursor..marker_start]);
                break;
            }
            BlockScan::Closed {
                marker_start,
                json_start,
                json_end,
                end,
            } => {
                match parse_command(&text[json_start..json_end]) {
                    Some(command) => {
                        cleaned.push_str(&text[cursor..marker_start]);
                        commands.push(command);
                    }
                    None => {
                        // Not a command: the entire literal stays in place
                        cleaned.push_str(&text[cursor..end]);
                    }
                }
                cursor = end;
            }
        }
    }

    (cleaned, commands)
}
