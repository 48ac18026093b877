//! The seam between the workflow and notification delivery.
//!
//! `notify` is fire-and-forget: it cannot fail from the caller's point of
//! view and must not block on delivery.

use std::sync::Mutex;

use crate::models::notification::NotificationEvent;

pub trait Notifier: Send + Sync {
    fn notify(&self, event: NotificationEvent);
}

/// Keeps every event in memory for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: NotificationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
