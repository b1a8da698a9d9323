//! Client sink trait: the channel's delivery boundary.
//!
//! The IDE layer owns the implementation; the channel only ever calls it.
//! Callbacks are invoked from the channel's connection task, one frame at
//! a time in stream order, and never after the connection generation that
//! produced them has been torn down. Implementations must not block for
//! long; they may call back into the channel (`disconnect`/`dispose`) -
//! delivery holds no locks.

use crate::notifications::{
    FileNotification, MessageNotification, PermissionNotification, SessionNotification,
};

/// Receiver for routed upstream notifications.
pub trait EventSink: Send + Sync {
    fn on_session_event(&self, notification: SessionNotification);
    fn on_message_event(&self, notification: MessageNotification);
    fn on_file_event(&self, notification: FileNotification);
    fn on_permission_event(&self, notification: PermissionNotification);
}
