//! Game events and their dispatch
//!
//! - [`GameEvent`]: closed set of notifications exchanged between subsystems
//! - [`EventBus`]: synchronous fan-out keyed by [`EventKind`]
//! - [`EventHandler`]: per-tick lifecycle of event-driven subsystems
//! - [`EventInbox`]: cross-thread queue drained onto the bus each tick

mod bus;
mod error;
mod event;
mod handler;
mod inbox;

#[cfg(test)]
mod bus_tests;

pub use bus::{DispatchReport, EventBus, Listener};
pub use error::{InboxClosed, ListenerError};
pub use event::{
    EncounterId, EnemyKind, EnemyRef, EntityId, EventKind, GameEvent, PhaseChange, Point, Rect,
    RoricEffect, TeleportDirection,
};
pub use handler::{EventHandler, HandlerRegistry, SharedHandler};
pub use inbox::{EventInbox, EventSender, event_channel};
