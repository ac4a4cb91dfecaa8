use tracing::{debug, info};

use crate::game_loop::{Simulation, SimulationError};

/// A top-level mode of the game (menu, playing, ...)
pub trait GameState {
    fn name(&self) -> &'static str;

    /// Called once when the state becomes current
    fn enter(&mut self) {}

    /// Called once when the state is replaced
    fn exit(&mut self) {}

    fn update(&mut self) -> Result<(), SimulationError>;

    /// Return to the state's initial condition without leaving it
    fn reset(&mut self) {}

    fn is_paused(&self) -> bool {
        false
    }
}

/// What the renderer gets each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub state: &'static str,
    pub paused: bool,
}

/// Owns the current state and feeds it the loop's logical updates
pub struct StateManager {
    current: Box<dyn GameState>,
    tick: u64,
}

impl StateManager {
    pub fn new(mut initial: Box<dyn GameState>) -> Self {
        initial.enter();
        info!(state = initial.name(), "Entered state");
        Self {
            current: initial,
            tick: 0,
        }
    }

    /// Tear down the current state and enter `next`
    pub fn switch_to(&mut self, mut next: Box<dyn GameState>) {
        let from = self.current.name();
        self.current.exit();
        next.enter();
        info!(from, to = next.name(), "Switched state");
        self.current = next;
    }

    /// Reset the current state in place
    pub fn reset(&mut self) {
        debug!(state = self.current.name(), "Resetting state");
        self.current.reset();
    }

    pub fn current(&self) -> &dyn GameState {
        self.current.as_ref()
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }
}

impl Simulation for StateManager {
    type Snapshot = FrameSnapshot;

    fn update(&mut self) -> Result<(), SimulationError> {
        self.tick += 1;
        self.current.update()
    }

    fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            state: self.current.name(),
            paused: self.current.is_paused(),
        }
    }
}

/// State with no simulation, e.g. the title menu
#[derive(Debug, Default)]
pub struct MenuState;

impl GameState for MenuState {
    fn name(&self) -> &'static str {
        "menu"
    }

    fn update(&mut self) -> Result<(), SimulationError> {
        Ok(())
    }
}
