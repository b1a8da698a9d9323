//! OpenSpace proxy streaming layer.
//!
//! This crate is the systems core of the OpenSpace IDE chat extension's
//! backend proxy:
//!
//! - [`commands`] extracts the embedded `%%OS{...}%%` command protocol
//!   from streamed assistant text without ever failing on malformed input.
//! - [`channel`] maintains the long-lived SSE connection to the agent
//!   server, routes events to a client sink, and recovers from transport
//!   failures with fenced exponential backoff.
//! - [`sse`] tokenizes raw response bytes into named event frames.
//! - [`notifications`] maps frames onto the four client notification
//!   domains.
//! - [`models`] holds the shared content fragment types.

pub mod channel;
pub mod commands;
pub mod models;
pub mod notifications;
pub mod sse;
