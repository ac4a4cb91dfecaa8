//! Hand-off of events raised off the game thread
//!
//! The bus itself is single-threaded. Producers on other threads (input,
//! tooling) push through an [`EventSender`]; the playing state publishes
//! everything queued in the [`EventInbox`] at the start of each tick.

use tokio::sync::mpsc;

use super::{GameEvent, InboxClosed};

#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<GameEvent>,
}

impl EventSender {
    pub fn send(&self, event: GameEvent) -> Result<(), InboxClosed> {
        self.tx.send(event).map_err(|_| InboxClosed)
    }
}

#[derive(Debug)]
pub struct EventInbox {
    rx: mpsc::UnboundedReceiver<GameEvent>,
}

impl EventInbox {
    /// Next queued event in arrival order, if any
    pub fn next_event(&mut self) -> Option<GameEvent> {
        self.rx.try_recv().ok()
    }
}

pub fn event_channel() -> (EventSender, EventInbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSender { tx }, EventInbox { rx })
}
