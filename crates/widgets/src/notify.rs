//! Publish/subscribe channel for the `menuToggle` notification.
//!
//! The menu publishes on every toggle; any number of observers (the header,
//! the CLI's logger) receive every event in order.

use historia_types::{MENU_TOGGLE_EVENT, MenuToggleEvent};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

#[derive(Debug, Default)]
pub struct NotificationBus {
    observers: Vec<UnboundedSender<MenuToggleEvent>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. Dropping the receiver unsubscribes it.
    pub fn subscribe(&mut self) -> UnboundedReceiver<MenuToggleEvent> {
        let (sender, receiver) = unbounded_channel();
        self.observers.push(sender);
        receiver
    }

    /// Delivers `event` to every live observer and returns how many received it.
    pub fn notify(&mut self, event: MenuToggleEvent) -> usize {
        self.observers.retain(|observer| observer.send(event).is_ok());
        debug!(event = MENU_TOGGLE_EVENT, collapsed = event.collapsed, observers = self.observers.len(), "notified");
        self.observers.len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
