//! Top-level game states
//!
//! The [`StateManager`] is what the game loop drives. Commands that change
//! the state itself (pause, resume, reset) are queued while a tick runs and
//! applied after it, so no handler is torn down mid-dispatch.

mod commands;
mod encounters;
mod manager;
mod playing;

#[cfg(test)]
mod playing_tests;

pub use commands::{StateCommand, StateCommands};
pub use encounters::{EncounterRoster, EncounterSet};
pub use manager::{FrameSnapshot, GameState, MenuState, StateManager};
pub use playing::PlayingState;
