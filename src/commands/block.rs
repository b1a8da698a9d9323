//! Command block extraction from captured JSON spans.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structured instruction embedded by the agent in streamed text.
///
/// The proxy has no knowledge of what `cmd` values mean; blocks are handed
/// to the IDE's command registry as opaque records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandBlock {
    /// Command identifier, e.g. `openspace.focusFile`.
    pub cmd: String,
    /// Command arguments. Either the value of an explicit `args` key or an
    /// object assembled from the block's other keys.
    pub args: Value,
}

/// Try to interpret a captured `{...}` span as a command block.
///
/// Returns `None` when the span is not valid JSON, not an object, or has
/// no string-typed `cmd` field. Callers treat `None` as "leave the literal
/// text in place" - extraction failure is never an error.
pub(crate) fn parse_command(raw: &str) -> Option<CommandBlock> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    let cmd = object.get("cmd")?.as_str()?.to_string();

    let args = match object.get("args") {
        Some(args) => args.clone(),
        None => {
            // No explicit args key: every sibling of cmd becomes an argument
            let siblings = object
                .iter()
                .filter(|(key, _)| key.as_str() != "cmd")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            Value::Object(siblings)
        }
    };

    Some(CommandBlock { cmd, args })
}
