//! Recording sink used to observe channel deliveries in tests.

use std::sync::Mutex;

use openspace_proxy::channel::EventSink;
use openspace_proxy::notifications::{
    FileNotification, MessageNotification, PermissionNotification, SessionNotification,
};

/// One recorded sink callback, in delivery order.
#[derive(Debug, Clone, PartialEq)]
pub enum Received {
    Session(SessionNotification),
    Message(MessageNotification),
    File(FileNotification),
    Permission(PermissionNotification),
}

/// An `EventSink` that appends every delivery to a list.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Mutex<Vec<Received>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything received so far.
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    fn push(&self, entry: Received) {
        self.received.lock().unwrap().push(entry);
    }
}

impl EventSink for RecordingSink {
    fn on_session_event(&self, notification: SessionNotification) {
        self.push(Received::Session(notification));
    }

    fn on_message_event(&self, notification: MessageNotification) {
        self.push(Received::Message(notification));
    }

    fn on_file_event(&self, notification: FileNotification) {
        self.push(Received::File(notification));
    }

    fn on_permission_event(&self, notification: PermissionNotification) {
        self.push(Received::Permission(notification));
    }
}
