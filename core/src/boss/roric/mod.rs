//! Roric, the time-scripted boss
//!
//! The fight follows a fixed soundtrack: phase starts, ambient flashes and
//! finale shakes are all keyed to milliseconds since the boss engaged.

mod definition;
mod effects;
mod encounter;
mod phase_manager;


pub use definition::{DEFINITION_FILE, PhaseEntry, RoricDefinition, ShakeSpec};
pub use effects::{RoricCue, RoricEffectsHandler};
pub use encounter::RoricEncounter;
pub use phase_manager::{PhaseUpdate, RoricAttack, RoricPhase, RoricPhaseManager};
