use std::cell::RefCell;
use std::rc::Rc;

use crate::game_loop::SimulationError;

/// Per-tick behaviour of a subsystem that reacts to game events.
///
/// Event reactions are wired through the bus; this trait covers the
/// lifecycle calls the owning state forwards every tick.
pub trait EventHandler {
    /// Runs once per logical update while the game is not paused
    fn continuous_update(&mut self);

    fn pause(&mut self) {}

    fn unpause(&mut self) {}

    fn reset(&mut self) {}
}

pub type SharedHandler = Rc<RefCell<dyn EventHandler>>;

/// Ordered set of handlers owned by the active state
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<(&'static str, SharedHandler)>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H: EventHandler + 'static>(&mut self, handler: &Rc<RefCell<H>>) {
        let shared: SharedHandler = handler.clone();
        self.handlers.push((std::any::type_name::<H>(), shared));
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn continuous_update_all(&self) -> Result<(), SimulationError> {
        for (name, handler) in &self.handlers {
            let mut handler = handler
                .try_borrow_mut()
                .map_err(|_| SimulationError::HandlerBusy { handler: *name })?;
            handler.continuous_update();
        }
        Ok(())
    }

    pub fn pause_all(&self) {
        self.for_each(|h| h.pause());
    }

    pub fn unpause_all(&self) {
        self.for_each(|h| h.unpause());
    }

    pub fn reset_all(&self) {
        self.for_each(|h| h.reset());
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    fn for_each(&self, mut f: impl FnMut(&mut dyn EventHandler)) {
        for (name, handler) in &self.handlers {
            match handler.try_borrow_mut() {
                Ok(mut h) => f(&mut *h),
                Err(_) => tracing::warn!(handler = name, "Skipping busy handler"),
            }
        }
    }
}
