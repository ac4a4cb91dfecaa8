//! Shared services handed to every handler
//!
//! [`GameContext`] is the explicit replacement for global singletons: the
//! event bus, the clock, the presentation and world collaborators and the
//! deferred state command queue are constructed once and cloned into each
//! consumer.

mod clock;
mod config;
mod error;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use config::{AppConfig, AppConfigExt, DebugSettings, LoopSettings};
pub use error::ConfigError;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::events::{EventBus, EventKind};
use crate::presentation::Presentation;
use crate::state::{StateCommand, StateCommands};
use crate::world::WorldControl;

/// Services shared by the states and handlers of one game session.
///
/// Cloning is cheap and every clone refers to the same bus, clock and
/// collaborators.
#[derive(Clone)]
pub struct GameContext {
    pub bus: Rc<EventBus>,
    pub clock: Arc<dyn TimeSource>,
    pub presentation: Rc<RefCell<dyn Presentation>>,
    pub world: Rc<RefCell<dyn WorldControl>>,
    pub commands: Rc<StateCommands>,
    pub debug: DebugSettings,
}

impl GameContext {
    /// Build a context with a fresh bus. Pause/resume notifications are
    /// translated into deferred state commands here, once per session.
    pub fn new(
        clock: Arc<dyn TimeSource>,
        presentation: Rc<RefCell<dyn Presentation>>,
        world: Rc<RefCell<dyn WorldControl>>,
        debug: DebugSettings,
    ) -> Self {
        let bus = Rc::new(EventBus::new());
        let commands = Rc::new(StateCommands::default());

        let pause_queue = Rc::clone(&commands);
        bus.register(EventKind::GamePaused, move |_| {
            pause_queue.push(StateCommand::Pause)
        });
        let resume_queue = Rc::clone(&commands);
        bus.register(EventKind::GameResumed, move |_| {
            resume_queue.push(StateCommand::Resume)
        });

        Self {
            bus,
            clock,
            presentation,
            world,
            commands,
            debug,
        }
    }

    /// Current clock reading in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
